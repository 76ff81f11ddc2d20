use rand::{seq::SliceRandom, Rng};

use super::HintLevel;
use crate::puzzle::{Category, Puzzle};

const NO_HINT: &str = "There is no hint available for this puzzle.";
const GENERIC: [&str; 3] = [
    "Look for four words that share a hidden connection.",
    "Some of these words have more in common than it seems.",
    "Try sorting the board by theme before guessing.",
];
/// Has no alphanumeric tokens, so it cannot name any word.
const LAST_RESORT: &str = "...";
const TRAITS: [&str; 3] = ["theme", "property", "characteristic"];

/// Picks a category at random and fills one of the level's phrasings.
/// Phrasings that would name more of the puzzle's words than the level
/// allows are never returned, filler words included.
pub fn template_hint<R: Rng + ?Sized>(puzzle: &Puzzle, level: HintLevel, rng: &mut R) -> String {
    if puzzle.categories.is_empty() {
        return NO_HINT.to_string();
    }
    let hint = match level {
        HintLevel::Beginner => beginner(puzzle, rng),
        HintLevel::Intermediate => intermediate(puzzle, rng),
        HintLevel::Advanced => advanced(puzzle, rng),
    };
    hint.unwrap_or_else(|| generic(puzzle, rng))
}

fn beginner<R: Rng + ?Sized>(puzzle: &Puzzle, rng: &mut R) -> Option<String> {
    let options: Vec<Vec<String>> = puzzle
        .categories
        .iter()
        .map(|category| {
            let theme = category.name.to_lowercase();
            let bank = [
                format!("One group contains items related to {theme}."),
                format!("Look for words that could be classified as {theme}."),
                format!("Think about {theme} for one of the groups."),
                format!("One category involves {theme}."),
            ];
            safe(puzzle, &bank, &[])
        })
        .filter(|bank| !bank.is_empty())
        .collect();

    options.choose(rng)?.choose(rng).cloned()
}

fn intermediate<R: Rng + ?Sized>(puzzle: &Puzzle, rng: &mut R) -> Option<String> {
    let category: &Category = puzzle.categories.choose(rng)?;
    let theme = category.name.to_lowercase();
    let examples: Vec<&str> = category
        .members
        .choose_multiple(rng, 2)
        .map(String::as_str)
        .collect();
    let trait_word = TRAITS.choose(rng).copied().unwrap_or("theme");

    let mut bank = vec![
        format!("Look for words that share a common {trait_word}."),
        format!("Some words might be related to {theme}, but not in an obvious way."),
    ];
    if let Some(first) = examples.first() {
        bank.push(format!("Consider different ways to group '{first}' with other words."));
    }
    if let [first, second] = examples.as_slice() {
        bank.push(format!("Think about what '{first}' and '{second}' have in common."));
    }
    safe(puzzle, &bank, &examples).choose(rng).cloned()
}

fn advanced<R: Rng + ?Sized>(puzzle: &Puzzle, rng: &mut R) -> Option<String> {
    let category = puzzle.categories.choose(rng)?;
    let word = category.members.choose(rng)?;
    let theme = category.name.to_lowercase();

    let bank = [
        format!("'{word}' is part of a category related to {theme}."),
        format!("'{word}' belongs with the words connected to {theme}."),
        format!("Try to find the other words that, like '{word}', relate to {theme}."),
        format!("Focus on '{word}': its group is about {theme}."),
    ];
    safe(puzzle, &bank, &[word.as_str()]).choose(rng).cloned()
}

fn generic<R: Rng + ?Sized>(puzzle: &Puzzle, rng: &mut R) -> String {
    let bank = GENERIC.map(String::from);
    safe(puzzle, &bank, &[])
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| LAST_RESORT.to_string())
}

/// Keeps the phrasings that name no puzzle word outside `allowed`.
fn safe(puzzle: &Puzzle, bank: &[String], allowed: &[&str]) -> Vec<String> {
    bank.iter()
        .filter(|text| {
            puzzle
                .categories
                .iter()
                .flat_map(|category| &category.members)
                .all(|word| allowed.contains(&word.as_str()) || !mentions_word(text, word))
        })
        .cloned()
        .collect()
}

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Whether `word` shows up in `text` as a whole token run, ignoring case and
/// punctuation. `"Things that are RED"` mentions `"red"` but not `"re"`.
pub fn mentions_word(text: &str, word: &str) -> bool {
    let needle = tokens(word);
    if needle.is_empty() {
        return false;
    }
    tokens(text)
        .windows(needle.len())
        .any(|window| window == needle.as_slice())
}
