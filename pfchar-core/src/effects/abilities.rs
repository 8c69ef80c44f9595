//! Feat formulas.

/// Weapon Training: +1 at level 3 and another +1 every four levels after.
pub fn weapon_training_bonus(level: i32) -> i32 {
    1 + (level - 3).max(0).div_euclid(4)
}

/// Power Attack attack penalty: -1, and another -1 per 4 points of base attack bonus.
pub fn power_attack_penalty(base_attack_bonus: i32) -> i32 {
    -(base_attack_bonus.div_euclid(4) + 1)
}

/// Power Attack damage: twice the penalty, times 1.5 when wielding two-handed.
pub fn power_attack_damage(base_attack_bonus: i32, two_handed: bool) -> i32 {
    let value = (base_attack_bonus.div_euclid(4) + 1) * 2;
    if two_handed {
        self::two_handed(value)
    } else {
        value
    }
}

/// Scale a damage bonus by 1.5, truncating toward zero.
pub fn two_handed(value: i32) -> i32 {
    value * 3 / 2
}
