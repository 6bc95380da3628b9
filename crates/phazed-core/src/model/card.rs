use crate::model::suit::{Colour, Suit};
use crate::model::value::Value;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// A single playing card, written as value symbol then suit symbol (`"0H"`, `"AS"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Card {
    pub value: Value,
    pub suit: Suit,
}

impl Card {
    pub const fn new(value: Value, suit: Suit) -> Self {
        Self { value, suit }
    }

    /// Aces are always wild.
    pub const fn is_wild(self) -> bool {
        matches!(self.value, Value::Ace)
    }

    pub const fn colour(self) -> Colour {
        self.suit.colour()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.suit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardParseError(pub String);

impl fmt::Display for CardParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a card of the 52-card deck", self.0)
    }
}

impl std::error::Error for CardParseError {}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(v), Some(s), None) => match (Value::from_symbol(v), Suit::from_symbol(s)) {
                (Some(value), Some(suit)) => Ok(Card::new(value, suit)),
                _ => Err(CardParseError(raw.to_string())),
            },
            _ => Err(CardParseError(raw.to_string())),
        }
    }
}

impl TryFrom<String> for Card {
    type Error = CardParseError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

/// Parses a whitespace separated list such as `"2C 3C AS"`.
pub fn parse_cards(raw: &str) -> Result<Vec<Card>, CardParseError> {
    raw.split_whitespace().map(str::parse).collect()
}
