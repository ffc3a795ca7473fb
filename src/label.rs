//! Transition labels are free text: a comma separated list of input symbols such as `"a, b"`,
//! or the marker [`EPSILON`] for a transition that consumes no input. Nothing validates a label
//! when it is stored; the functions in this module parse it whenever a derived view is built.
//!
//! State labels are display names. The ones generated by the store follow the pattern `q<N>`,
//! which [`sort_state_labels`] orders numerically.

use itertools::Itertools;

/// The marker used for an empty (epsilon) transition.
pub const EPSILON: &str = "ε";

/// Splits a transition label into its symbols. The label is trimmed, split on commas and every
/// piece is trimmed again, empty pieces are dropped. The [`EPSILON`] marker is passed through,
/// use [`alphabet_symbols`] to skip it.
///
/// ```
/// let symbols: Vec<_> = ametista::label::symbols(" a, b ,,c ").collect();
/// assert_eq!(symbols, ["a", "b", "c"]);
/// ```
pub fn symbols(label: &str) -> impl Iterator<Item = &str> + '_ {
    label
        .trim()
        .split(',')
        .map(str::trim)
        .filter(|symbol| !symbol.is_empty())
}

/// Like [`symbols`], but skips the [`EPSILON`] marker, yielding only symbols that belong to
/// the alphabet.
pub fn alphabet_symbols(label: &str) -> impl Iterator<Item = &str> + '_ {
    symbols(label).filter(|symbol| *symbol != EPSILON)
}

/// Returns true if the label is exactly the [`EPSILON`] marker (ignoring surrounding whitespace).
pub fn is_epsilon(label: &str) -> bool {
    label.trim() == EPSILON
}

/// Returns true if the transition carries no input symbol, i.e. the label is blank or the
/// [`EPSILON`] marker. Such transitions are drawn as empty transitions.
pub fn is_empty_label(label: &str) -> bool {
    let trimmed = label.trim();
    trimmed.is_empty() || trimmed == EPSILON
}

/// Normalizes user input for a transition label: surrounding whitespace is removed and a blank
/// input becomes [`EPSILON`].
pub fn normalize_label(input: &str) -> String {
    match input.trim() {
        "" => EPSILON.to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Joins symbols back into a label in the canonical `"a, b"` form.
pub fn join_symbols<I, S>(symbols: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    symbols.into_iter().map(|s| s.as_ref().to_string()).join(", ")
}

/// Returns the digits of a state label of the form `q<digits>`, `None` for any other label.
pub fn state_digits(label: &str) -> Option<&str> {
    label
        .strip_prefix('q')
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Returns `N` for a state label of the form `q<N>`. Labels whose number does not fit into
/// a `u64` are treated as not numbered.
pub fn state_number(label: &str) -> Option<u64> {
    state_digits(label).and_then(|digits| digits.parse().ok())
}

/// Sorts state labels numerically where possible: two labels `q<N>` and `q<M>` are ordered by
/// `N` and `M`, everything else falls back to plain lexicographic order.
///
/// Numbered labels are compared through their number zero-padded to the widest number in the
/// slice, which keeps the comparison a total order even when numbered and free-form labels are
/// mixed. Labels that only differ in leading zeros are tie-broken by their raw text.
///
/// ```
/// let mut labels = vec!["q10", "q2", "q1"];
/// ametista::label::sort_state_labels(&mut labels);
/// assert_eq!(labels, ["q1", "q2", "q10"]);
/// ```
pub fn sort_state_labels<S: AsRef<str>>(labels: &mut [S]) {
    let width = labels
        .iter()
        .filter_map(|label| state_digits(label.as_ref()))
        .map(str::len)
        .max()
        .unwrap_or(0);
    labels.sort_by_cached_key(|label| {
        let raw = label.as_ref();
        let key = match state_digits(raw) {
            Some(digits) => format!("q{digits:0>width$}"),
            None => raw.to_string(),
        };
        (key, raw.to_string())
    });
}

/// Formats an alphabet for the status line, e.g. `Σ = {a, b}` or `Σ = ∅` if it is empty.
pub fn alphabet_display<S: AsRef<str>>(alphabet: &[S]) -> String {
    if alphabet.is_empty() {
        "Σ = ∅".to_string()
    } else {
        format!(
            "Σ = {{{}}}",
            alphabet.iter().map(|symbol| symbol.as_ref()).join(", ")
        )
    }
}
