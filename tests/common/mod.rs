#![allow(dead_code)]

use chrono::NaiveDate;
use connections_server::{Category, Puzzle, Submission};

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

pub fn sample_puzzle(raw_date: &str) -> Puzzle {
    Puzzle {
        id: 7,
        date: date(raw_date),
        title: "Sample".into(),
        difficulty: "easy".into(),
        categories: vec![
            Category::new("Fish", ["BASS", "PIKE", "SOLE", "CARP"]),
            Category::new("Planets", ["MARS", "VENUS", "EARTH", "SATURN"]),
            Category::new("Poker Terms", ["FLOP", "RIVER", "TELL", "BLIND"]),
            Category::new("Palindromes", ["KAYAK", "LEVEL", "MOM", "RACECAR"]),
        ],
    }
}

pub fn groups(raw: &[&[&str]]) -> Submission {
    Submission::new(
        raw.iter()
            .map(|group| group.iter().map(|word| word.to_string()).collect())
            .collect(),
    )
}

pub fn solution(puzzle: &Puzzle) -> Vec<Vec<String>> {
    puzzle
        .categories
        .iter()
        .map(|category| category.members.clone())
        .collect()
}
