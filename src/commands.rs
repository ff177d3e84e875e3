//! Local command registry and fuzzy filter for the palette.

use crate::state::{CommandEntry, PaletteState};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Commands handled by the client itself; none of them reach /chat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocalCommand {
    Reset,
    Clear,
    Logs,
    Help,
    Quit,
}

/// Palette order. Aliases live in `services::parse_local_command`.
const REGISTRY: &[(&str, &str)] = &[
    ("/reset", "Réinitialiser la conversation côté serveur"),
    ("/clear", "Effacer l'affichage"),
    ("/logs", "Afficher ou masquer le journal"),
    ("/help", "Commandes et raccourcis"),
    ("/quit", "Quitter"),
];

pub fn registry() -> Vec<CommandEntry> {
    REGISTRY
        .iter()
        .map(|(name, description)| CommandEntry {
            name: (*name).to_string(),
            description: (*description).to_string(),
        })
        .collect()
}

pub fn help_text() -> String {
    let mut text = String::from("Commandes :\n");
    for (name, description) in REGISTRY {
        text.push_str(&format!("  {name:<8} {description}\n"));
    }
    text.push_str(
        "Touches : Entrée envoyer · ↑↓ historique · PgUp/PgDn défiler · Échap quitter la saisie · F2 journal · Ctrl+C quitter",
    );
    text
}

/// Update palette filtered list from query (fuzzy match on name + description).
pub fn update_palette_filter(palette: &mut PaletteState) {
    let query = palette.query.trim().to_lowercase();
    if query.is_empty() {
        palette.filtered = (0..palette.commands.len()).collect();
    } else {
        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, usize)> = palette
            .commands
            .iter()
            .enumerate()
            .filter_map(|(i, c)| {
                let name_score = matcher.fuzzy_match(&c.name.to_lowercase(), &query);
                let desc_score = matcher.fuzzy_match(&c.description.to_lowercase(), &query);
                name_score.or(desc_score).map(|s| (s, i))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        palette.filtered = scored.into_iter().map(|(_, i)| i).collect();
    }
    palette.selected_index = 0;
    palette.navigated = false;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(query: &str) -> PaletteState {
        let mut p = PaletteState {
            commands: registry(),
            query: query.to_string(),
            ..Default::default()
        };
        update_palette_filter(&mut p);
        p
    }

    #[test]
    fn empty_query_lists_everything_in_order() {
        let p = palette("");
        assert_eq!(p.filtered, (0..REGISTRY.len()).collect::<Vec<_>>());
        assert_eq!(p.selected_command().map(|c| c.name.as_str()), Some("/reset"));
    }

    #[test]
    fn query_narrows_to_matching_command() {
        let p = palette("clear");
        assert_eq!(p.selected_command().map(|c| c.name.as_str()), Some("/clear"));
    }

    #[test]
    fn nothing_matches_gibberish() {
        let p = palette("zzzz");
        assert!(p.filtered.is_empty());
        assert!(p.selected_command().is_none());
    }

    #[test]
    fn help_mentions_every_command() {
        let help = help_text();
        for (name, _) in REGISTRY {
            assert!(help.contains(name), "{name} missing from help");
        }
    }
}
