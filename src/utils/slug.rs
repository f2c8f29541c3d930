//! Human-readable timesheet slugs: `adjective-noun-NNNN`.

use rand::Rng;
use rand::seq::SliceRandom;

const ADJECTIVES: &[&str] = &[
    "amber", "brave", "calm", "clever", "crisp", "eager", "gentle", "golden", "happy", "humble",
    "jolly", "keen", "lively", "lucky", "mellow", "nimble", "proud", "quiet", "rapid", "silent",
    "steady", "sunny", "swift", "tidy", "vivid", "witty",
];

const NOUNS: &[&str] = &[
    "anchor", "badger", "beacon", "canyon", "cedar", "comet", "falcon", "forest", "harbor",
    "island", "lantern", "maple", "meadow", "otter", "pebble", "pine", "river", "robin",
    "summit", "thistle", "tiger", "valley", "willow", "wren",
];

pub fn generate_slug() -> String {
    let mut rng = rand::thread_rng();
    let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or("steady");
    let noun = NOUNS.choose(&mut rng).copied().unwrap_or("otter");
    let number: u16 = rng.gen_range(1000..10000);
    format!("{adjective}-{noun}-{number}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn slug_has_three_parts() {
        let re = Regex::new(r"^[a-z]+-[a-z]+-\d{4}$").unwrap();
        for _ in 0..50 {
            let s = generate_slug();
            assert!(re.is_match(&s), "{s}");
        }
    }
}
