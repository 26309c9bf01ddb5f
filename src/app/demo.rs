//! Built-in deck used when no `--cards` file is given.

use crate::core::card::{Card, CardDeck};

pub fn demo_deck() -> CardDeck {
    CardDeck::new(vec![
        Card::new("About").subtitle(
            "Founding developer building scalable web applications, \
             with an interest in LLM, speech and image model products.",
        ),
        Card::new("Espressohost Website")
            .subtitle(
                "Developed and maintained the main product website: \
                 20% faster page loads, 25% better search visibility.",
            )
            .badge("Live Demo"),
        Card::new("Giglance")
            .subtitle(
                "Open-source freelance platform giving beginners real project \
                 experience. Built key frontend components.",
            )
            .badge("Source Code"),
        Card::new("Skills").subtitle(
            "Next.js · React · TypeScript · FastAPI · TailwindCSS · \
             LangChain · Ollama · Docker · Git",
        ),
        Card::new("Contact").subtitle("Source, profiles and the live portfolio."),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progress::MAX_CARDS;

    #[test]
    fn demo_fills_the_stack() {
        let deck = demo_deck();
        assert_eq!(deck.len(), MAX_CARDS);
        assert_eq!(deck.get(1).and_then(|c| c.badge.as_deref()), Some("Live Demo"));
        // No explicit backgrounds: the palette cycles.
        assert_eq!(deck.background_for(3), deck.background_for(0));
    }
}
