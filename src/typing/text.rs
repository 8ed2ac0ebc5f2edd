//! Practice text generation from fixed sentence banks

use crate::config::UnknownValue;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Sentence bank selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium => Self::Hard,
            Self::Hard => Self::Easy,
        }
    }

    fn bank(&self) -> &'static [&'static str] {
        match self {
            Self::Easy => EASY,
            Self::Medium => MEDIUM,
            Self::Hard => HARD,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Difficulty {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(UnknownValue::new("difficulty", s)),
        }
    }
}

const EASY: &[&str] = &[
    "The sun is shining bright today.",
    "I love to play games with my friends.",
    "Cats and dogs are cute animals.",
    "We walked to the park nearby.",
    "She reads a book every night.",
    "Blue is my favorite color.",
    "He runs very fast in the morning.",
    "Apples are red and tasty.",
    "The sky is clear and blue.",
    "I can type very fast now.",
    "Summer days are long and warm.",
    "My car is parked outside.",
    "Birds sing songs in the trees.",
    "The water in the lake is cold.",
    "We are going to the zoo.",
    "It is fun to cook dinner.",
    "Music makes me feel happy.",
    "The moon shines at night.",
    "I have a big red ball.",
    "Time flies when you have fun.",
];

const MEDIUM: &[&str] = &[
    "The quick brown fox jumps over the lazy dog.",
    "Technology is changing the way we live and work.",
    "It's important to get enough sleep each night.",
    "The journey of a thousand miles begins with a single step.",
    "Reading improves your vocabulary and imagination.",
    "Don't count your chickens before they hatch.",
    "Creative thinking leads to innovation and progress.",
    "The weather forecast predicts rain later this afternoon.",
    "Consistency is the key to mastering any new skill.",
    "Communication is vital for building strong relationships.",
    "Exploring nature helps to reduce stress and anxiety.",
    "Music has the power to connect people from all cultures.",
    "Always try to see the bright side of things.",
    "Learning a new language opens up many focused opportunities.",
    "Healthy eating habits contribute to a longer life.",
    "Problem solving is a crucial soft skill in the workplace.",
    "The stars twinkle beautifully in the midnight sky.",
    "She decided to start a new hobby regarding painting.",
    "Efficient time management allows for more leisure activities.",
    "Kindness is a language that the deaf can hear.",
];

const HARD: &[&str] = &[
    "To be, or not to be, that is the question: whether 'tis nobler in the mind to suffer.",
    "The only thing we have to fear is fear itself; nameless, unreasoning, unjustified terror.",
    "In the midst of chaos, there is also opportunity.",
    "Do not dwell in the past, do not dream of the future, concentrate the mind on the present moment.",
    "Success is not final, failure is not fatal: it is the courage to continue that counts.",
    "It involves thinking about the fundamental nature of knowledge, reality, and existence.",
    "The industrial revolution marked a major turning point in history; almost every aspect of daily life was influenced.",
    "Artificial intelligence is leveraging computers and machines to mimic the problem-solving and decision-making capabilities of the human mind.",
    "Quantum mechanics is a fundamental theory in physics that provides a description of the physical properties of nature.",
    "Sustainability focuses on meeting the needs of the present without compromising the ability of future generations to meet theirs.",
    "Cryptocurrency is a digital or virtual currency that is secured by cryptography, which makes it nearly impossible to counterfeit.",
    "The concept of the 'uncanny valley' suggests that humanoid objects which appear almost, but not exactly, like real human beings elicit feelings of eeriness.",
    "Photosynthesis is the process used by plants, algae and certain bacteria to harness energy from sunlight and turn it into chemical energy.",
    "Globalization describes the growing interdependence of the world's economies, cultures, and populations, brought about by cross-border trade.",
    "Neuroplasticity is the brain's ability to reorganize itself by forming new neural connections throughout life.",
];

/// Produce at least `min_count` words for `difficulty`.
///
/// Whole sentences are drawn uniformly with replacement and split on
/// whitespace. The last sentence is never truncated, so the result may run
/// past `min_count`.
pub fn produce<R: Rng + ?Sized>(
    difficulty: Difficulty,
    min_count: usize,
    rng: &mut R,
) -> Vec<String> {
    let bank = difficulty.bank();
    let mut words = Vec::with_capacity(min_count + 24);

    while words.len() < min_count {
        let Some(sentence) = bank.choose(rng) else {
            break;
        };
        words.extend(sentence.split_whitespace().map(str::to_string));
    }

    words
}
