//! Tests for prompt construction.

use explorer::build_prompt;
use explorer_core::{GENERIC_PERSONA, Topic};
use strum::IntoEnumIterator;

#[test]
fn every_topic_gets_its_persona_and_the_question() {
    let question = "Explain this: 50% of *all* \"cases\"?";
    for topic in Topic::iter() {
        let prompt = build_prompt(topic.label(), question);
        assert!(
            prompt.contains(topic.persona()),
            "{} prompt lacks its persona",
            topic
        );
        assert!(prompt.contains(&format!("**Topic:** {}", topic.label())));
        assert!(prompt.contains(question));
    }
}

#[test]
fn topic_lookup_ignores_case_and_whitespace() {
    let prompt = build_prompt("  current events ", "What happened today?");
    assert!(prompt.contains("**Topic:** Current Events"));
    assert!(prompt.contains(Topic::CurrentEvents.persona()));
}

#[test]
fn unknown_topic_falls_back_to_generic_persona() {
    let prompt = build_prompt("Cooking", "How long do I boil an egg?");
    assert!(prompt.contains("**Topic:** Cooking"));
    assert!(prompt.contains(GENERIC_PERSONA));
    assert!(prompt.contains("How long do I boil an egg?"));
}

#[test]
fn empty_inputs_still_build_a_prompt() {
    let prompt = build_prompt("", "");
    assert!(prompt.contains("**Topic:** General"));
    assert!(prompt.contains(GENERIC_PERSONA));
    assert!(prompt.ends_with("**Question:** \n"));
}

#[test]
fn prompt_layout_is_stable() {
    assert_eq!(
        build_prompt("Weather", "Why is it windy?"),
        "**Topic:** Weather\n\
         **Instruction:** You are a meteorologist who can explain weather phenomena and forecasts.\n\
         \n\
         Please answer the following question based on the provided topic and instruction.\n\
         \n\
         **Question:** Why is it windy?\n"
    );
}

#[test]
fn building_is_deterministic() {
    assert_eq!(
        build_prompt("Space", "Is Pluto a planet?"),
        build_prompt("Space", "Is Pluto a planet?")
    );
}
