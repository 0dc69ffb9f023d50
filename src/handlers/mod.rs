pub mod chat;
pub mod diary;
pub mod health;
pub mod helplines;
pub mod moods;
pub mod reports;
pub mod speech;
pub mod stats;
pub mod tips;
