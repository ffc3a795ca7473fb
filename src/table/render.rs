use std::fmt::Display;

use owo_colors::OwoColorize;

use crate::Show;

use super::TransitionTable;

impl TransitionTable {
    /// Returns a string representation of the table. The first column lists the states, where
    /// the initial state is prefixed with `→` and final states with `*`. Empty cells show as `-`
    /// and cells with several targets as a set like `{q1, q2}`.
    pub fn render(&self) -> String {
        self.build(|state| self.decorate(state))
    }

    /// Like [`TransitionTable::render`], but additionally highlights the initial state in green
    /// and final states in bold using ANSI escape codes.
    pub fn render_colored(&self) -> String {
        self.build(|state| {
            let decorated = self.decorate(state);
            match (self.is_initial(state), self.is_final(state)) {
                (true, true) => decorated.green().bold().to_string(),
                (true, false) => decorated.green().to_string(),
                (false, true) => decorated.bold().to_string(),
                (false, false) => decorated,
            }
        })
    }

    fn decorate(&self, state: &str) -> String {
        let initial = if self.is_initial(state) { "→" } else { " " };
        let accepting = if self.is_final(state) { "*" } else { " " };
        format!("{initial}{accepting}{state}")
    }

    fn build<SD: Fn(&str) -> String>(&self, state_decorator: SD) -> String {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(self.alphabet.iter().cloned()),
        );
        for (state, cells) in self.rows() {
            builder.push_record(
                std::iter::once(state_decorator(state)).chain(cells.into_iter().map(Show::show)),
            );
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl Display for TransitionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn renders_sample() {
        let mut automaton = crate::tests::sample();
        automaton.add_transition(
            crate::Transition::new("extra", "n0", "n2").with_label("a"),
        );
        let rendered = automaton.transition_table().render();

        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[1].contains("State"));
        assert!(lines[1].contains('a') && lines[1].contains('c'));
        assert!(rendered.contains("→ q0"));
        assert!(rendered.contains(" *q2"));
        assert!(rendered.contains("{q1, q2}"));
        assert!(rendered.contains('-'));
        assert_eq!(rendered, format!("{}", automaton.transition_table()));
    }

    #[test]
    fn colored_rendering_keeps_content() {
        let table = crate::tests::sample().transition_table();
        let colored = table.render_colored();
        assert!(colored.contains("\u{1b}["));
        assert!(colored.contains("q1"));
    }

    #[test]
    fn renders_without_alphabet() {
        let mut automaton = crate::Automaton::default();
        automaton
            .add_state(crate::State::new("n0", "q0"))
            .unwrap();
        let rendered = automaton.transition_table().render();
        assert!(rendered.contains("State"));
        assert!(rendered.contains("q0"));
    }
}
