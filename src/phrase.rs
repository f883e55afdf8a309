// Copyright (c) 2026 rezky_nightky

use rand::{rngs::StdRng, Rng};

/// Supplies captions for the speech bubble.
pub trait PhraseSource {
    fn next_phrase(&mut self) -> String;
}

const ADVERBS: &[&str] = &[
    "seamlessly",
    "proactively",
    "holistically",
    "synergistically",
    "dynamically",
    "efficiently",
    "globally",
    "continuously",
    "collaboratively",
    "radically",
];

const VERBS: &[&str] = &[
    "leverage",
    "disrupt",
    "orchestrate",
    "monetize",
    "streamline",
    "incubate",
    "empower",
    "iterate on",
    "evangelize",
    "reinvent",
];

const ADJECTIVES: &[&str] = &[
    "scalable",
    "cloud-native",
    "mission-critical",
    "frictionless",
    "bleeding-edge",
    "data-driven",
    "next-generation",
    "agile",
    "immersive",
    "quantum",
];

const NOUNS: &[&str] = &[
    "paradigms",
    "synergies",
    "deliverables",
    "microservices",
    "mindshare",
    "value chains",
    "pipelines",
    "blockchains",
    "user journeys",
    "core competencies",
];

fn pick<'a>(rng: &mut StdRng, words: &[&'a str]) -> &'a str {
    words[rng.random_range(0..words.len())]
}

/// Random corporate buzzword phrases: adverb, verb, adjective, noun.
pub struct BuzzPhrases {
    rng: StdRng,
}

impl BuzzPhrases {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl PhraseSource for BuzzPhrases {
    fn next_phrase(&mut self) -> String {
        let adverb = pick(&mut self.rng, ADVERBS);
        let verb = pick(&mut self.rng, VERBS);
        let adjective = pick(&mut self.rng, ADJECTIVES);
        let noun = pick(&mut self.rng, NOUNS);

        let mut phrase = format!("{} {} {} {}", adverb, verb, adjective, noun);
        if let Some(first) = phrase.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        phrase.push('!');
        phrase
    }
}

/// Cycles through a fixed list of phrases in order.
pub struct FixedPhrases {
    phrases: Vec<String>,
    next: usize,
}

impl FixedPhrases {
    /// Returns `None` when there is nothing to cycle through. Control
    /// characters become spaces so a phrase can only print glyphs.
    pub fn new(phrases: Vec<String>) -> Option<Self> {
        let phrases: Vec<String> = phrases
            .into_iter()
            .map(|p| {
                p.chars()
                    .map(|c| if c.is_control() { ' ' } else { c })
                    .collect::<String>()
                    .trim()
                    .to_string()
            })
            .filter(|p| !p.is_empty())
            .collect();
        if phrases.is_empty() {
            return None;
        }
        Some(Self { phrases, next: 0 })
    }
}

impl PhraseSource for FixedPhrases {
    fn next_phrase(&mut self) -> String {
        let p = self.phrases[self.next % self.phrases.len()].clone();
        self.next = (self.next + 1) % self.phrases.len();
        p
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn buzz_phrases_have_four_parts_and_a_bang() {
        let mut src = BuzzPhrases::new(StdRng::seed_from_u64(1));
        for _ in 0..20 {
            let p = src.next_phrase();
            assert!(p.ends_with('!'));
            assert!(p.chars().next().unwrap().is_ascii_uppercase());
            assert!(p.split_whitespace().count() >= 4, "{}", p);
        }
    }

    #[test]
    fn same_seed_same_phrases() {
        let mut a = BuzzPhrases::new(StdRng::seed_from_u64(99));
        let mut b = BuzzPhrases::new(StdRng::seed_from_u64(99));
        for _ in 0..5 {
            assert_eq!(a.next_phrase(), b.next_phrase());
        }
    }

    #[test]
    fn fixed_phrases_cycle_and_skip_blanks() {
        let mut src =
            FixedPhrases::new(vec!["hello".into(), "  ".into(), " world ".into()]).unwrap();
        assert_eq!(src.next_phrase(), "hello");
        assert_eq!(src.next_phrase(), "world");
        assert_eq!(src.next_phrase(), "hello");
    }

    #[test]
    fn fixed_phrases_need_at_least_one() {
        assert!(FixedPhrases::new(vec![" ".into()]).is_none());
        assert!(FixedPhrases::new(vec!["\t\n\x07".into()]).is_none());
    }

    #[test]
    fn control_characters_never_reach_the_screen() {
        let mut src =
            FixedPhrases::new(vec!["hi\x1b[2Jthere".into(), "two\nlines\r".into()]).unwrap();
        let first = src.next_phrase();
        assert_eq!(first, "hi [2Jthere");
        assert_eq!(src.next_phrase(), "two lines");
        assert!(!first.chars().any(char::is_control));
    }
}
