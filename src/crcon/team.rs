//! Team classification for live player records
//!
//! CRCON's live stats do not always say which side a player is on. An
//! explicit `team` field wins; otherwise weapon kills are matched against
//! faction arsenals.

use super::PlayerRecord;
use crate::stats::Side;
use serde_json::Value;

/// Maps a raw player record to a side
pub trait TeamClassifier: Send + Sync {
    fn classify(&self, player: &PlayerRecord) -> Side;
}

/// German weapons
const AXIS_WEAPONS: &[&str] = &[
    "MP40",
    "GEWEHR 43",
    "KARABINER 98K",
    "STG44",
    "FG42",
    "MG34",
    "MG42",
    "LUGER P08",
    "WALTHER P38",
    "FLAMMENWERFER 41",
    "PANZERSCHRECK",
    "M24 STIELHANDGRANATE",
    "TELLERMINE 43",
    "S-MINE",
    "FELDSPATEN",
];

/// US, British and Soviet weapons
const ALLIED_WEAPONS: &[&str] = &[
    "M1 GARAND",
    "M1 CARBINE",
    "M1A1 THOMPSON",
    "M3 GREASE GUN",
    "M1918A2 BAR",
    "BROWNING M1919",
    "M1903 SPRINGFIELD",
    "M97 TRENCH GUN",
    "COLT M1911",
    "BAZOOKA",
    "M2 FLAMETHROWER",
    "MK2 GRENADE",
    "M2 AP MINE",
    "M1A1 AT MINE",
    "M3 KNIFE",
    "MOSIN NAGANT",
    "SVT40",
    "PPSH 41",
    "DP-27",
    "NAGANT M1895",
    "TOKAREV TT33",
    "PTRS-41",
    "RG-42 GRENADE",
    "LEE-ENFIELD PATTERN 1914",
    "SMLE NO.1 MK III",
    "RIFLE NO.4 MK I",
    "RIFLE NO.5 MK I",
    "STEN GUN",
    "BREN GUN",
    "LEWIS GUN",
    "LANCHESTER",
    "WEBLEY MK VI",
    "PIAT",
    "MILLS BOMB",
];

/// Default classifier: explicit team field, then weapon evidence
#[derive(Debug, Clone, Copy, Default)]
pub struct FactionClassifier;

impl FactionClassifier {
    pub fn new() -> Self {
        Self
    }

    fn from_team_field(player: &PlayerRecord) -> Option<Side> {
        let side = match player.get("team")? {
            Value::String(s) => s.as_str(),
            Value::Object(team) => team.get("side")?.as_str()?,
            _ => return None,
        };
        parse_side(side)
    }

    fn from_weapons(player: &PlayerRecord) -> Side {
        let Some(Value::Object(weapons)) = player.get("weapons") else {
            return Side::Unknown;
        };

        let mut axis = 0.0;
        let mut allied = 0.0;
        for (weapon, kills) in weapons {
            let kills = kills.as_f64().unwrap_or(0.0);
            let weapon = weapon.trim().to_uppercase();
            if matches_any(&weapon, AXIS_WEAPONS) {
                axis += kills;
            } else if matches_any(&weapon, ALLIED_WEAPONS) {
                allied += kills;
            }
        }

        if axis > allied {
            Side::Axis
        } else if allied > axis {
            Side::Allies
        } else {
            Side::Unknown
        }
    }
}

impl TeamClassifier for FactionClassifier {
    fn classify(&self, player: &PlayerRecord) -> Side {
        Self::from_team_field(player).unwrap_or_else(|| Self::from_weapons(player))
    }
}

fn parse_side(s: &str) -> Option<Side> {
    match s.trim().to_lowercase().as_str() {
        "axis" => Some(Side::Axis),
        "allies" | "allied" => Some(Side::Allies),
        _ => None,
    }
}

fn matches_any(weapon: &str, arsenal: &[&str]) -> bool {
    arsenal.iter().any(|name| weapon.starts_with(name))
}
