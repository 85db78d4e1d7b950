use std::time::Duration;

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

use crate::{secs_to_duration, BulletKind, EnemyKind, TimerError, WeaponKind};

/// Tuning shipped with the game, used when no override file is supplied.
pub const DEFAULT_TUNING_TOML: &str = include_str!("../../assets/tuning.toml");

/// Errors produced while loading tuning tables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be parsed or lacked a required table.
    #[error("tuning document is malformed: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value parsed but falls outside its permitted range.
    #[error("tuning value `{field}` {reason}")]
    Invalid {
        /// Dotted path of the offending value.
        field: String,
        /// Constraint that was violated.
        reason: &'static str,
    },
    /// A duration value could not be converted.
    #[error("tuning value `{field}` is not a valid duration")]
    Duration {
        /// Dotted path of the offending value.
        field: String,
        /// Underlying conversion failure.
        #[source]
        source: TimerError,
    },
}

/// Pixel sizes of the sprites that define entity extents.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpriteMetrics {
    /// Player and regular enemy sprite size.
    pub character: Vec2,
    /// Boss sprite size.
    pub boss: Vec2,
    /// Bullet sprite size.
    pub bullet: Vec2,
    /// Explosion sprite size, which is also the blast area.
    pub explosion: Vec2,
    /// Car obstacle sprite size.
    pub car: Vec2,
    /// Pickup sprite size.
    pub collectable: Vec2,
}

/// Player statistics.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerStats {
    /// Maximum and starting health.
    pub health: i32,
    /// Movement speed in pixels per second.
    pub speed: f32,
    /// Spare magazines carried for the starting pistol.
    pub starting_magazines: u32,
}

/// What a killed enemy may leave behind.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DropTable {
    /// Probability in `[0, 1]` that a drop happens at all.
    pub chance: f64,
    /// Cash granted by a cash pickup.
    pub cash: u32,
    /// Health restored by a health pickup.
    pub health: i32,
    /// Magazines granted by an ammo pickup.
    pub magazines: u32,
}

/// Per enemy type base statistics before wave scaling.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnemyStats {
    /// Base health.
    pub health: i32,
    /// Base movement speed.
    pub speed: f32,
    /// Base distance at which the enemy starts attacking.
    pub attack_range: f32,
    /// Score awarded to the killer; also the wave budget cost.
    pub score: u32,
    /// Linear growth per wave applied to health, speed and range.
    pub scaling: f32,
    /// Relative weight when sampling regular wave members. Zero never samples.
    #[serde(default)]
    pub weight: u32,
}

/// Validated statistics of a firearm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileStats {
    /// Bullet speed in pixels per second.
    pub speed: f32,
    /// Damage per hit.
    pub damage: i32,
    /// Time a reload blocks the next one.
    pub reload: Duration,
    /// Time between two shots.
    pub cooldown: Duration,
    /// Magazine capacity.
    pub max_ammo: u32,
    /// Purchase price.
    pub cost: u32,
    /// Projectile variant fired.
    pub bullet: BulletKind,
    /// Muzzle position relative to the owner's corner, one per facing.
    pub muzzle: [Vec2; 8],
}

/// Validated statistics of a melee weapon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeleeStats {
    /// Damage dealt to every victim of a swing.
    pub damage: i32,
    /// Time between two swings that connected.
    pub cooldown: Duration,
    /// Amount the reach area extends beyond the owner.
    pub range: f32,
}

/// Validated wave pacing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPacing {
    /// Time after which the next wave starts regardless of survivors.
    pub wave_timeout: Duration,
    /// Interval between two queued enemies entering the arena.
    pub release_interval: Duration,
    /// Budget granted per wave number.
    pub budget_per_wave: u32,
    /// Every wave divisible by this number brings a boss.
    pub boss_every: u32,
    /// How long the wave banner stays on screen.
    pub banner: Duration,
    /// Distance outside the arena edges where enemies appear.
    pub spawn_margin: f32,
}

/// Complete, validated game tuning.
#[derive(Clone, Debug, PartialEq)]
pub struct Tuning {
    /// Arena width and height.
    pub arena: Vec2,
    /// Sprite extents.
    pub sprites: SpriteMetrics,
    /// Player statistics.
    pub player: PlayerStats,
    /// Drop table for killed enemies.
    pub drops: DropTable,
    /// Wave pacing.
    pub spawning: SpawnPacing,
    enemies: [EnemyStats; 3],
    projectiles: [ProjectileStats; 4],
    melee: [MeleeStats; 2],
}

impl Tuning {
    /// Parses and validates a TOML tuning document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: TuningFile = toml::from_str(contents)?;
        file.validate()
    }

    /// Parses the tuning shipped with the game.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml_str(DEFAULT_TUNING_TOML)
    }

    /// Base statistics for an enemy type.
    #[must_use]
    pub fn enemy(&self, kind: EnemyKind) -> &EnemyStats {
        &self.enemies[kind.index()]
    }

    /// Firearm statistics, or `None` for melee weapons.
    #[must_use]
    pub fn projectile(&self, kind: WeaponKind) -> Option<&ProjectileStats> {
        let index = match kind {
            WeaponKind::Pistol => 0,
            WeaponKind::Uzi => 1,
            WeaponKind::Rifle => 2,
            WeaponKind::Rpg => 3,
            WeaponKind::Melee | WeaponKind::MeleeBoss => return None,
        };
        self.projectiles.get(index)
    }

    /// The firearm every player starts with.
    #[must_use]
    pub fn starting_firearm(&self) -> (WeaponKind, &ProjectileStats) {
        (WeaponKind::Pistol, &self.projectiles[0])
    }

    /// Melee statistics, or `None` for firearms.
    #[must_use]
    pub fn melee(&self, kind: WeaponKind) -> Option<&MeleeStats> {
        match kind {
            WeaponKind::Melee => self.melee.first(),
            WeaponKind::MeleeBoss => self.melee.get(1),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TuningFile {
    arena: ArenaRecord,
    sprites: SpriteMetrics,
    player: PlayerStats,
    drops: DropTable,
    spawning: SpawningRecord,
    enemies: EnemyTables,
    weapons: WeaponTables,
    melee: MeleeTables,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArenaRecord {
    width: f32,
    height: f32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SpawningRecord {
    wave_timeout: f32,
    release_interval: f32,
    budget_per_wave: u32,
    boss_every: u32,
    banner: f32,
    spawn_margin: f32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EnemyTables {
    walker: EnemyStats,
    cop: EnemyStats,
    boss: EnemyStats,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WeaponTables {
    pistol: ProjectileRecord,
    uzi: ProjectileRecord,
    rifle: ProjectileRecord,
    rpg: ProjectileRecord,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectileRecord {
    speed: f32,
    damage: i32,
    reload: f32,
    cooldown: f32,
    max_ammo: u32,
    cost: u32,
    bullet: BulletKind,
    muzzle: [Vec2; 8],
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MeleeTables {
    standard: MeleeRecord,
    boss: MeleeRecord,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MeleeRecord {
    damage: i32,
    cooldown: f32,
    range: f32,
}

impl TuningFile {
    fn validate(self) -> Result<Tuning, ConfigError> {
        positive("arena.width", self.arena.width)?;
        positive("arena.height", self.arena.height)?;
        validate_sprites(&self.sprites)?;

        positive_int("player.health", self.player.health)?;
        positive("player.speed", self.player.speed)?;

        if !(0.0..=1.0).contains(&self.drops.chance) {
            return Err(invalid("drops.chance", "must lie within [0, 1]"));
        }
        positive_int("drops.health", self.drops.health)?;

        let spawning = SpawnPacing {
            wave_timeout: duration("spawning.wave_timeout", self.spawning.wave_timeout)?,
            release_interval: duration("spawning.release_interval", self.spawning.release_interval)?,
            budget_per_wave: non_zero("spawning.budget_per_wave", self.spawning.budget_per_wave)?,
            boss_every: non_zero("spawning.boss_every", self.spawning.boss_every)?,
            banner: duration("spawning.banner", self.spawning.banner)?,
            spawn_margin: self.spawning.spawn_margin,
        };
        if !spawning.spawn_margin.is_finite() || spawning.spawn_margin < 0.0 {
            return Err(invalid("spawning.spawn_margin", "must be finite and non-negative"));
        }

        let enemies = [
            validate_enemy("enemies.walker", self.enemies.walker)?,
            validate_enemy("enemies.cop", self.enemies.cop)?,
            validate_enemy("enemies.boss", self.enemies.boss)?,
        ];
        if enemies.iter().all(|stats| stats.weight == 0) {
            return Err(invalid("enemies", "at least one enemy needs a non-zero weight"));
        }

        let projectiles = [
            validate_projectile("weapons.pistol", self.weapons.pistol)?,
            validate_projectile("weapons.uzi", self.weapons.uzi)?,
            validate_projectile("weapons.rifle", self.weapons.rifle)?,
            validate_projectile("weapons.rpg", self.weapons.rpg)?,
        ];
        let melee = [
            validate_melee("melee.standard", self.melee.standard)?,
            validate_melee("melee.boss", self.melee.boss)?,
        ];

        Ok(Tuning {
            arena: Vec2::new(self.arena.width, self.arena.height),
            sprites: self.sprites,
            player: self.player,
            drops: self.drops,
            spawning,
            enemies,
            projectiles,
            melee,
        })
    }
}

fn validate_sprites(sprites: &SpriteMetrics) -> Result<(), ConfigError> {
    let entries = [
        ("sprites.character", sprites.character),
        ("sprites.boss", sprites.boss),
        ("sprites.bullet", sprites.bullet),
        ("sprites.explosion", sprites.explosion),
        ("sprites.car", sprites.car),
        ("sprites.collectable", sprites.collectable),
    ];
    for (field, size) in entries {
        positive(field, size.x)?;
        positive(field, size.y)?;
    }
    Ok(())
}

fn validate_enemy(table: &str, stats: EnemyStats) -> Result<EnemyStats, ConfigError> {
    positive_int(&format!("{table}.health"), stats.health)?;
    positive(&format!("{table}.speed"), stats.speed)?;
    positive(&format!("{table}.attack_range"), stats.attack_range)?;
    let _ = non_zero(&format!("{table}.score"), stats.score)?;
    if !stats.scaling.is_finite() || stats.scaling < 0.0 {
        return Err(invalid(
            format!("{table}.scaling"),
            "must be finite and non-negative",
        ));
    }
    Ok(stats)
}

fn validate_projectile(table: &str, record: ProjectileRecord) -> Result<ProjectileStats, ConfigError> {
    positive(&format!("{table}.speed"), record.speed)?;
    positive_int(&format!("{table}.damage"), record.damage)?;
    if record
        .muzzle
        .iter()
        .any(|offset| !offset.is_finite())
    {
        return Err(invalid(format!("{table}.muzzle"), "must hold finite offsets"));
    }
    Ok(ProjectileStats {
        speed: record.speed,
        damage: record.damage,
        reload: duration(&format!("{table}.reload"), record.reload)?,
        cooldown: duration(&format!("{table}.cooldown"), record.cooldown)?,
        max_ammo: non_zero(&format!("{table}.max_ammo"), record.max_ammo)?,
        cost: record.cost,
        bullet: record.bullet,
        muzzle: record.muzzle,
    })
}

fn validate_melee(table: &str, record: MeleeRecord) -> Result<MeleeStats, ConfigError> {
    positive_int(&format!("{table}.damage"), record.damage)?;
    positive(&format!("{table}.range"), record.range)?;
    Ok(MeleeStats {
        damage: record.damage,
        cooldown: duration(&format!("{table}.cooldown"), record.cooldown)?,
        range: record.range,
    })
}

fn invalid(field: impl Into<String>, reason: &'static str) -> ConfigError {
    ConfigError::Invalid {
        field: field.into(),
        reason,
    }
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be a positive finite number"))
    }
}

fn positive_int(field: &str, value: i32) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(invalid(field, "must be greater than zero"))
    }
}

fn non_zero(field: &str, value: u32) -> Result<u32, ConfigError> {
    if value == 0 {
        Err(invalid(field, "must be greater than zero"))
    } else {
        Ok(value)
    }
}

fn duration(field: &str, seconds: f32) -> Result<Duration, ConfigError> {
    secs_to_duration(seconds).map_err(|source| ConfigError::Duration {
        field: field.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tuning_is_valid() {
        let tuning = Tuning::builtin().expect("shipped tuning parses");
        assert_eq!(tuning.enemy(EnemyKind::Boss).weight, 0);
        assert!(tuning.projectile(WeaponKind::Melee).is_none());
        assert_eq!(
            tuning.projectile(WeaponKind::Rifle).map(|stats| stats.bullet),
            Some(BulletKind::Piercing)
        );
        assert!(tuning.melee(WeaponKind::MeleeBoss).is_some());
    }

    #[test]
    fn negative_reload_is_rejected() {
        let broken = DEFAULT_TUNING_TOML.replacen("reload = 1.2", "reload = -1.2", 1);
        assert_ne!(broken, DEFAULT_TUNING_TOML);
        let error = Tuning::from_toml_str(&broken).expect_err("negative reload");
        assert!(
            matches!(
                &error,
                ConfigError::Duration {
                    field,
                    source: TimerError::Negative(_),
                } if field == "weapons.pistol.reload"
            ),
            "unexpected error: {error}"
        );
    }

    #[test]
    fn missing_table_is_a_parse_error() {
        let truncated = DEFAULT_TUNING_TOML
            .split("[melee.boss]")
            .next()
            .unwrap_or_default();
        assert!(matches!(
            Tuning::from_toml_str(truncated),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn zero_score_is_rejected() {
        let broken = DEFAULT_TUNING_TOML.replacen("score = 1\n", "score = 0\n", 1);
        assert_ne!(broken, DEFAULT_TUNING_TOML);
        assert!(matches!(
            Tuning::from_toml_str(&broken),
            Err(ConfigError::Invalid { field, .. }) if field == "enemies.walker.score"
        ));
    }
}
