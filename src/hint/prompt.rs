use std::fmt::Write;

use super::HintLevel;
use crate::puzzle::Puzzle;

fn disclosure_rule(level: HintLevel) -> &'static str {
    match level {
        HintLevel::Beginner => {
            "Give a beginner hint: describe the theme of exactly one group in general \
             terms, such as \"one group relates to ...\". Do not mention any of the \
             puzzle's words."
        }
        HintLevel::Intermediate => {
            "Give an intermediate hint: describe the relationship shared by the words \
             of one group. You may mention at most two of that group's words as \
             examples, but never say which words complete the group."
        }
        HintLevel::Advanced => {
            "Give an advanced hint: pick one specific word and tell the player which \
             group it belongs to. Do not list the other words of that group."
        }
    }
}

/// Builds the completion prompt: the full answer key followed by what the
/// hint is allowed to reveal at `level`.
pub fn build_prompt(puzzle: &Puzzle, level: HintLevel) -> String {
    let mut prompt = String::from(
        "You are helping a player solve a word-grouping puzzle. \
         The hidden groups are:\n",
    );
    for category in &puzzle.categories {
        // Writing into a String cannot fail.
        let _ = writeln!(prompt, "- {}: {}", category.name, category.members.join(", "));
    }
    prompt.push('\n');
    prompt.push_str(disclosure_rule(level));
    prompt.push_str("\nReply with the hint only, in one or two sentences.");
    prompt
}
