//! Level, experience and hit point arithmetic for Pokémon records.

/// Minimum experience for each level, index 0 = level 1.
const EXPERIENCE_CHART: [i64; 100] = [
    0, 10, 20, 30, 40, 50, 60, 70, 80, 90, //
    110, 135, 160, 190, 220, 250, 285, 320, 360, 400, //
    460, 530, 600, 670, 745, 820, 900, 990, 1075, 1165, //
    1260, 1355, 1455, 1555, 1660, 1770, 1880, 1995, 2110, 2230, //
    2355, 2480, 2610, 2740, 2875, 3015, 3155, 3300, 3445, 3645, //
    3850, 4060, 4270, 4485, 4705, 4930, 5160, 5390, 5625, 5865, //
    6110, 6360, 6610, 6865, 7125, 7390, 7660, 7925, 8205, 8485, //
    8770, 9060, 9350, 9645, 9945, 10250, 10560, 10870, 11185, 11505, //
    11910, 12320, 12735, 13155, 13580, 14010, 14445, 14885, 15330, 15780, //
    16235, 16695, 17160, 17630, 18105, 18585, 19070, 19560, 20055, 20555,
];

pub const MAX_LEVEL: u32 = EXPERIENCE_CHART.len() as u32;

/// Level reached with `experience` points. Always in `1..=MAX_LEVEL`.
pub fn level(experience: i64) -> u32 {
    let reached = EXPERIENCE_CHART.partition_point(|&threshold| threshold <= experience);
    (reached as u32).max(1)
}

/// Progress from the current level towards the next, in `[0, 100)`.
///
/// Exactly 0 on a level boundary and at the maximum level.
pub fn percentage_to_next_level(experience: i64) -> f64 {
    let experience = experience.max(0);
    let current = level(experience);
    if current >= MAX_LEVEL {
        return 0.0;
    }
    let floor = EXPERIENCE_CHART[(current - 1) as usize];
    let next = EXPERIENCE_CHART[current as usize];
    (experience - floor) as f64 * 100.0 / (next - floor) as f64
}

/// Maximum hit points: level + 3 × HP stat + 10. Saturates at `u32::MAX`.
pub fn max_hp(level: u32, hp_stat: u32) -> u32 {
    hp_stat
        .saturating_mul(3)
        .saturating_add(level)
        .saturating_add(10)
}

/// Current health as a percentage of maximum.
///
/// Not clamped: inconsistent upstream data can yield values above 100 or
/// below 0, and templates are expected to cope.
pub fn health_percentage(current: f64, max: u32) -> f64 {
    current * 100.0 / f64::from(max)
}

/// Sprite file stem for a species, e.g. `"Mr. Mime"` → `"mr-mime"`.
///
/// Falls back to the zero-padded dex number when the name has nothing
/// usable in it.
pub fn normalize_pokemon_name(name: &str, dex_number: u32) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.chars() {
        let mapped: Option<&str> = match ch {
            '♀' => Some("f"),
            '♂' => Some("m"),
            _ => None,
        };
        if let Some(suffix) = mapped {
            if !slug.is_empty() {
                slug.push('-');
            }
            slug.push_str(suffix);
            pending_hyphen = false;
        } else if ch.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(ch.to_lowercase());
        } else if ch == '\'' || ch == '’' || ch == '.' {
            // Dropped without splitting the word: "Farfetch'd" → "farfetchd".
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        format!("{dex_number:03}")
    } else {
        slug
    }
}
