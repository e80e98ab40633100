use crate::models::Person;

/// Dealbreaker phrases the filter knows how to evaluate
///
/// Free text outside this list is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dealbreaker {
    /// "smoker": rules out partners who answered "yes" to substance use
    Smoker,
    /// "bad communicator": recognized, but no survey answer can confirm it
    BadCommunicator,
}

impl Dealbreaker {
    const RECOGNIZED: [(&'static str, Dealbreaker); 2] = [
        ("smoker", Dealbreaker::Smoker),
        ("bad communicator", Dealbreaker::BadCommunicator),
    ];

    /// Whether `other` trips this dealbreaker
    pub fn triggered_by(&self, other: &Person) -> bool {
        match self {
            Dealbreaker::Smoker => other
                .substance_use
                .as_deref()
                .map(|answer| answer.trim().eq_ignore_ascii_case("yes"))
                .unwrap_or(false),
            Dealbreaker::BadCommunicator => false,
        }
    }
}

/// Dealbreakers recognized in a person's free-text answer
pub fn recognized_dealbreakers(person: &Person) -> Vec<Dealbreaker> {
    let Some(text) = person.dealbreakers.as_deref() else {
        return Vec::new();
    };
    let text = text.to_lowercase();

    Dealbreaker::RECOGNIZED
        .iter()
        .filter(|(token, _)| text.contains(token))
        .map(|(_, dealbreaker)| *dealbreaker)
        .collect()
}

/// Check whether `a` is interested in `b`'s gender
#[inline]
pub fn is_interested_in(a: &Person, b: &Person) -> bool {
    let interests = a.interest_categories();
    b.gender_categories()
        .iter()
        .any(|category| interests.contains(category))
}

/// Both people must be interested in each other's gender
#[inline]
pub fn orientation_compatible(a: &Person, b: &Person) -> bool {
    is_interested_in(a, b) && is_interested_in(b, a)
}

/// Neither person's recognized dealbreakers are tripped by the other
#[inline]
pub fn dealbreakers_clear(a: &Person, b: &Person) -> bool {
    let a_blocks = recognized_dealbreakers(a)
        .iter()
        .any(|dealbreaker| dealbreaker.triggered_by(b));
    let b_blocks = recognized_dealbreakers(b)
        .iter()
        .any(|dealbreaker| dealbreaker.triggered_by(a));

    !a_blocks && !b_blocks
}

/// Whether a match between `a` and `b` is permissible at all
#[inline]
pub fn is_eligible(a: &Person, b: &Person) -> bool {
    orientation_compatible(a, b) && dealbreakers_clear(a, b)
}
