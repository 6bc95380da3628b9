use crate::model::card::Card;
use serde::{Deserialize, Serialize};

/// A card tagged with its slot in the hand it was drawn from.
///
/// Rule checks look at `card`; removal and membership use `slot`, so two
/// cards that compare equal are never confused with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeldCard {
    pub slot: usize,
    pub card: Card,
}

impl HeldCard {
    pub const fn new(slot: usize, card: Card) -> Self {
        Self { slot, card }
    }
}

/// Ordered cards owned by one player. Order is significant to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn insert_front(&mut self, card: Card) {
        self.cards.insert(0, card);
    }

    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(index) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Tags every card with its position.
    pub fn held(&self) -> Vec<HeldCard> {
        self.cards
            .iter()
            .enumerate()
            .map(|(slot, &card)| HeldCard::new(slot, card))
            .collect()
    }
}

pub fn cards_of(held: &[HeldCard]) -> Vec<Card> {
    held.iter().map(|h| h.card).collect()
}

#[cfg(test)]
mod tests {
    use super::Hand;
    use crate::model::card::parse_cards;

    #[test]
    fn held_assigns_distinct_slots_to_equal_cards() {
        let hand = Hand::with_cards(parse_cards("3C 3C KD").unwrap());
        let held = hand.held();
        assert_eq!(held[0].card, held[1].card);
        assert_ne!(held[0].slot, held[1].slot);
        assert_eq!(held[2].slot, 2);
    }

    #[test]
    fn insert_front_keeps_remaining_order() {
        let mut hand = Hand::with_cards(parse_cards("2C 3C").unwrap());
        hand.insert_front("AS".parse().unwrap());
        let text: Vec<String> = hand.iter().map(|c| c.to_string()).collect();
        assert_eq!(text, ["AS", "2C", "3C"]);
        assert!(hand.remove("2C".parse().unwrap()));
        assert!(!hand.contains("2C".parse().unwrap()));
    }
}
