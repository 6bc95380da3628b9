pub mod card;
pub mod deck;
pub mod hand;
pub mod phase;
pub mod play;
pub mod suit;
pub mod table;
pub mod value;
