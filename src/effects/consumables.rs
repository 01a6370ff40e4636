//! Consumable center keys by authoring name.

use tracing::warn;

use crate::model::ConsumableSet;

const TAROTS: &[(&str, &str)] = &[
    ("the_fool", "c_fool"),
    ("the_magician", "c_magician"),
    ("the_high_priestess", "c_high_priestess"),
    ("the_empress", "c_empress"),
    ("the_emperor", "c_emperor"),
    ("the_hierophant", "c_hierophant"),
    ("the_lovers", "c_lovers"),
    ("the_chariot", "c_chariot"),
    ("justice", "c_justice"),
    ("the_hermit", "c_hermit"),
    ("the_wheel_of_fortune", "c_wheel_of_fortune"),
    ("strength", "c_strength"),
    ("the_hanged_man", "c_hanged_man"),
    ("death", "c_death"),
    ("temperance", "c_temperance"),
    ("the_devil", "c_devil"),
    ("the_tower", "c_tower"),
    ("the_star", "c_star"),
    ("the_moon", "c_moon"),
    ("the_sun", "c_sun"),
    ("judgement", "c_judgement"),
    ("the_world", "c_world"),
];

const PLANETS: &[(&str, &str)] = &[
    ("pluto", "c_pluto"),
    ("mercury", "c_mercury"),
    ("uranus", "c_uranus"),
    ("venus", "c_venus"),
    ("saturn", "c_saturn"),
    ("jupiter", "c_jupiter"),
    ("earth", "c_earth"),
    ("mars", "c_mars"),
    ("neptune", "c_neptune"),
    ("planet_x", "c_planet_x"),
    ("ceres", "c_ceres"),
    ("eris", "c_eris"),
];

const SPECTRALS: &[(&str, &str)] = &[
    ("familiar", "c_familiar"),
    ("grim", "c_grim"),
    ("incantation", "c_incantation"),
    ("talisman", "c_talisman"),
    ("aura", "c_aura"),
    ("wraith", "c_wraith"),
    ("sigil", "c_sigil"),
    ("ouija", "c_ouija"),
    ("ectoplasm", "c_ectoplasm"),
    ("immolate", "c_immolate"),
    ("ankh", "c_ankh"),
    ("deja_vu", "c_deja_vu"),
    ("hex", "c_hex"),
    ("trance", "c_trance"),
    ("medium", "c_medium"),
    ("cryptid", "c_cryptid"),
    ("the_soul", "c_soul"),
    ("black_hole", "c_black_hole"),
];

/// `(name, key)` pairs of a set.
#[must_use]
pub fn consumable_keys(set: ConsumableSet) -> &'static [(&'static str, &'static str)] {
    match set {
        ConsumableSet::Tarot => TAROTS,
        ConsumableSet::Planet => PLANETS,
        ConsumableSet::Spectral => SPECTRALS,
    }
}

/// Center key of a named card. Unknown names fall back to the first card
/// of the set.
#[must_use]
pub fn consumable_key(set: ConsumableSet, name: &str) -> &'static str {
    let keys = consumable_keys(set);
    if let Some((_, key)) = keys.iter().find(|(n, _)| *n == name) {
        return key;
    }
    let fallback = keys[0].1;
    warn!(card = name, set = set.set_name(), fallback, "unknown consumable, using fallback");
    fallback
}
