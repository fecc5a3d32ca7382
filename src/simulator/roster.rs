//! Simulated player roster
//!
//! Fixed identifier pool and profession catalog the simulator draws from.

use rand::Rng;

/// Player identifiers the simulator may bring into a fight
pub const PLAYER_POOL: [&str; 20] = [
    "123456789012345678",
    "234567890123456789",
    "345678901234567890",
    "456789012345678901",
    "567890123456789012",
    "678901234567890123",
    "789012345678901234",
    "890123456789012345",
    "901234567890123456",
    "012345678901234567",
    "112233445566778899",
    "223344556677889900",
    "334455667788990011",
    "445566778899001122",
    "556677889900112233",
    "667788990011223344",
    "778899001122334455",
    "889900112233445566",
    "990011223344556677",
    "001122334455667788",
];

/// Profession labels, as reported by the game client
pub const PROFESSIONS: [&str; 16] = [
    "射线", "冰矛", "居合", "月刃", "空枪", "重装", "鹰弓", "狼弓", "防盾", "光盾", "岩盾", "格挡",
    "协奏", "狂音", "愈合", "惩戒",
];

/// Pick one identifier from the pool
pub fn random_player_id<R: Rng>(rng: &mut R) -> &'static str {
    PLAYER_POOL[rng.random_range(0..PLAYER_POOL.len())]
}

/// Pick `count` distinct identifiers from the pool
///
/// Partial Fisher-Yates over a copy of the pool. `count` is capped at the
/// pool size.
pub fn pick_distinct_players<R: Rng>(rng: &mut R, count: usize) -> Vec<&'static str> {
    let mut pool = PLAYER_POOL;
    let count = count.min(pool.len());

    for i in 0..count {
        let j = rng.random_range(i..pool.len());
        pool.swap(i, j);
    }

    pool[..count].to_vec()
}

/// Pick a profession uniformly from the catalog
pub fn random_profession<R: Rng>(rng: &mut R) -> &'static str {
    PROFESSIONS[rng.random_range(0..PROFESSIONS.len())]
}
