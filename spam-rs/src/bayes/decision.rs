//! Decision rule over two class scores

use crate::corpus::Label;

use super::scorer::ScoreOutcome;

/// Pick a label from the spam and ham scores.
///
/// The overflow counters are compared first. Only when they are equal do the
/// remaining products decide, and an exact tie goes to ham.
pub fn decide(spam_overflow: i64, spam_score: f64, ham_overflow: i64, ham_score: f64) -> Label {
    if spam_overflow > ham_overflow {
        Label::Spam
    } else if spam_overflow < ham_overflow {
        Label::Ham
    } else if spam_score > ham_score {
        Label::Spam
    } else {
        Label::Ham
    }
}

/// [`decide`] over two scoring outcomes
pub fn decide_outcomes(spam: &ScoreOutcome, ham: &ScoreOutcome) -> Label {
    decide(spam.overflow, spam.score, ham.overflow, ham.score)
}
