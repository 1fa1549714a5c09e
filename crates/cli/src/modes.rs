use anyhow::Result;

use canon_engine::PackBias;

/// A named retrieval mode: depth plus the pack-bias table applied to
/// every card score. Multipliers were tuned against the enriched
/// canon; packs not listed score at 1.0.
#[derive(Debug, Clone, Copy)]
pub struct Mode {
    pub name: &'static str,
    pub label: &'static str,
    pub top_k: usize,
    bias: &'static [(&'static str, f32)],
}

impl Mode {
    pub fn pack_bias(&self) -> Result<PackBias> {
        Ok(PackBias::from_entries(
            self.bias.iter().map(|(pack, mult)| (*pack, *mult)),
        )?)
    }

    pub fn bias_entries(&self) -> &'static [(&'static str, f32)] {
        self.bias
    }
}

pub const MODES: &[Mode] = &[
    Mode {
        name: "personal",
        label: "Personal",
        top_k: 10,
        bias: &[
            ("02_self_knowledge_awareness", 1.2),
            ("03_emotional_education", 1.2),
            ("01_integral_buddhism", 1.15),
            ("04_romantic_realism", 1.1),
            ("11_startup_canon", 0.9),
        ],
    },
    Mode {
        name: "work",
        label: "Work/Strategy",
        top_k: 13,
        bias: &[
            ("11_startup_canon", 1.25),
            ("18_sensemaking_cynefin", 1.2),
            ("13_systems_cybernetics", 1.15),
            ("17_antifragility_decision_making", 1.15),
            ("15_virtue_ethics", 1.05),
        ],
    },
    Mode {
        name: "news",
        label: "News",
        top_k: 12,
        bias: &[
            ("20_narrative_meaning", 1.15),
            ("10_feminism", 1.1),
            ("13_systems_cybernetics", 1.05),
        ],
    },
    Mode {
        name: "learning",
        label: "Learning",
        top_k: 15,
        bias: &[
            ("15_virtue_ethics", 1.1),
            ("12_critical_rationalism", 1.1),
            ("19_process_philosophy", 1.1),
            ("14_phenomenology_enactivism", 1.1),
            ("18_sensemaking_cynefin", 1.1),
        ],
    },
    Mode {
        name: "integral",
        label: "Integral",
        top_k: 16,
        bias: &[],
    },
];

pub fn find(name: &str) -> Option<&'static Mode> {
    let needle = name.to_lowercase();
    MODES.iter().find(|mode| mode.name == needle)
}

pub fn run() -> Result<()> {
    for mode in MODES {
        println!("{} ({}) top_k={}", mode.name, mode.label, mode.top_k);
        if mode.bias_entries().is_empty() {
            println!("  no pack bias");
        }
        for (pack, multiplier) in mode.bias_entries() {
            println!("  {pack} x{multiplier:.2}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mode_has_a_valid_bias_table() {
        for mode in MODES {
            assert!(mode.top_k > 0);
            let bias = mode.pack_bias().unwrap();
            for (pack, multiplier) in mode.bias_entries() {
                assert!((bias.multiplier_for(pack) - multiplier).abs() < f32::EPSILON);
            }
            assert_eq!(bias.multiplier_for("unknown_pack"), 1.0);
        }
    }

    #[test]
    fn modes_are_found_case_insensitively() {
        assert_eq!(find("Work").unwrap().top_k, 13);
        assert!(find("nope").is_none());
    }
}
