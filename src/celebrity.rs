use crate::detail::Region;
use crate::model::{Celebrity, CelebritySummary, Movie};

/// Summary line for a celebrity; wording depends on which roles have movies.
pub fn stats_line(celebrity: &Celebrity) -> String {
    let total = celebrity.total_movies;
    let directed = celebrity.as_director.len();
    let acted = celebrity.as_actor.len();
    match (directed > 0, acted > 0) {
        (true, true) => format!("{total} movies (as director: {directed}, as actor: {acted})"),
        (true, false) => format!("{total} movies (as director: {directed})"),
        (false, true) => format!("{total} movies (as actor: {acted})"),
        (false, false) => format!("{total} movies"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filmography {
    Director,
    Actor,
}

impl Filmography {
    pub fn title(self) -> &'static str {
        match self {
            Filmography::Director => "As Director",
            Filmography::Actor => "As Actor",
        }
    }
}

/// Celebrity view. Either fully loaded or a single error; never partial.
#[derive(Debug, Clone, PartialEq)]
pub enum CelebrityView {
    Loading { name: String },
    Loaded {
        celebrity: Celebrity,
        grid: Filmography,
        selected: usize,
    },
    Failed(String),
}

impl CelebrityView {
    pub fn loaded(celebrity: Celebrity) -> Self {
        let grid = if celebrity.as_director.is_empty() && !celebrity.as_actor.is_empty() {
            Filmography::Actor
        } else {
            Filmography::Director
        };
        CelebrityView::Loaded {
            celebrity,
            grid,
            selected: 0,
        }
    }

    /// Categories that get their own grid, in display order.
    pub fn grids(celebrity: &Celebrity) -> Vec<(Filmography, &[Movie])> {
        [
            (Filmography::Director, celebrity.as_director.as_slice()),
            (Filmography::Actor, celebrity.as_actor.as_slice()),
        ]
        .into_iter()
        .filter(|(_, movies)| !movies.is_empty())
        .collect()
    }

    pub fn switch_grid(&mut self) {
        if let CelebrityView::Loaded {
            celebrity,
            grid,
            selected,
        } = self
        {
            let next = match grid {
                Filmography::Director => Filmography::Actor,
                Filmography::Actor => Filmography::Director,
            };
            let has_movies = match next {
                Filmography::Director => !celebrity.as_director.is_empty(),
                Filmography::Actor => !celebrity.as_actor.is_empty(),
            };
            if has_movies {
                *grid = next;
                *selected = 0;
            }
        }
    }

    pub fn move_selection(&mut self, forward: bool) {
        let len = self.current_movies().len();
        if let CelebrityView::Loaded { selected, .. } = self {
            if forward {
                if *selected + 1 < len {
                    *selected += 1;
                }
            } else {
                *selected = selected.saturating_sub(1);
            }
        }
    }

    pub fn current_movies(&self) -> &[Movie] {
        match self {
            CelebrityView::Loaded {
                celebrity,
                grid: Filmography::Director,
                ..
            } => &celebrity.as_director,
            CelebrityView::Loaded {
                celebrity,
                grid: Filmography::Actor,
                ..
            } => &celebrity.as_actor,
            _ => &[],
        }
    }

    pub fn selected_movie(&self) -> Option<&Movie> {
        match self {
            CelebrityView::Loaded { selected, .. } => self.current_movies().get(*selected),
            _ => None,
        }
    }
}

/// Role filter for the celebrity index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleFilter {
    #[default]
    All,
    Director,
    Actor,
}

impl RoleFilter {
    pub fn next(self) -> Self {
        match self {
            RoleFilter::All => RoleFilter::Director,
            RoleFilter::Director => RoleFilter::Actor,
            RoleFilter::Actor => RoleFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RoleFilter::All => "All",
            RoleFilter::Director => "Directors",
            RoleFilter::Actor => "Actors",
        }
    }

    /// Value of the `role` query parameter; `None` asks for both lists.
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            RoleFilter::All => None,
            RoleFilter::Director => Some("director"),
            RoleFilter::Actor => Some("actor"),
        }
    }
}

/// Browsable list of celebrities, each of which opens a `CelebrityView`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CelebrityIndex {
    pub role: RoleFilter,
    pub entries: Region<Vec<CelebritySummary>>,
    pub selected: usize,
}

impl CelebrityIndex {
    /// Advance the role filter and drop the old rows until the reload lands.
    pub fn cycle_role(&mut self) {
        self.role = self.role.next();
        self.entries = Region::Loading;
        self.selected = 0;
    }

    pub fn show(&mut self, entries: Vec<CelebritySummary>) {
        self.entries = Region::Ready(entries);
        self.selected = 0;
    }

    pub fn move_selection(&mut self, forward: bool) {
        let len = self.entries.ready().map_or(0, Vec::len);
        if forward {
            if self.selected + 1 < len {
                self.selected += 1;
            }
        } else {
            self.selected = self.selected.saturating_sub(1);
        }
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.entries
            .ready()?
            .get(self.selected)
            .map(|entry| entry.name.trim())
            .filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movies(n: usize) -> Vec<Movie> {
        (0..n)
            .map(|i| Movie { movie_id: i as i64 + 1, ..Default::default() })
            .collect()
    }

    fn celebrity(directed: usize, acted: usize, total: i64) -> Celebrity {
        Celebrity {
            name: "姜文".to_string(),
            roles: vec!["director".into(), "actor".into()],
            total_movies: total,
            as_director: movies(directed),
            as_actor: movies(acted),
        }
    }

    #[test]
    fn test_stats_line_variants() {
        assert_eq!(stats_line(&celebrity(2, 3, 4)), "4 movies (as director: 2, as actor: 3)");
        assert_eq!(stats_line(&celebrity(2, 0, 2)), "2 movies (as director: 2)");
        assert_eq!(stats_line(&celebrity(0, 5, 5)), "5 movies (as actor: 5)");
        assert_eq!(stats_line(&celebrity(0, 0, 7)), "7 movies");
    }

    #[test]
    fn test_grids_skip_empty_categories() {
        let actor_only = celebrity(0, 2, 2);
        let grids = CelebrityView::grids(&actor_only);
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].0, Filmography::Actor);

        let view = CelebrityView::loaded(actor_only);
        assert_eq!(view.current_movies().len(), 2);
    }

    #[test]
    fn test_switch_and_select() {
        let mut view = CelebrityView::loaded(celebrity(1, 3, 3));
        assert_eq!(view.current_movies().len(), 1);
        view.switch_grid();
        assert_eq!(view.current_movies().len(), 3);
        view.move_selection(true);
        view.move_selection(true);
        view.move_selection(true);
        assert_eq!(view.selected_movie().map(|m| m.movie_id), Some(3));

        let mut director_only = CelebrityView::loaded(celebrity(2, 0, 2));
        director_only.switch_grid();
        assert_eq!(director_only.current_movies().len(), 2);
    }

    fn summary(name: &str, role: &str) -> CelebritySummary {
        CelebritySummary {
            id: Some(1),
            name: name.to_string(),
            role: Some(role.to_string()),
        }
    }

    #[test]
    fn test_index_role_cycle_and_selection() {
        let mut index = CelebrityIndex::default();
        assert_eq!(index.role.query_value(), None);
        index.show(vec![summary("姜文", "director"), summary(" ", "actor"), summary("葛优", "actor")]);
        assert_eq!(index.selected_name(), Some("姜文"));
        index.move_selection(true);
        assert_eq!(index.selected_name(), None);
        index.move_selection(true);
        index.move_selection(true);
        assert_eq!(index.selected_name(), Some("葛优"));

        index.cycle_role();
        assert_eq!(index.role, RoleFilter::Director);
        assert_eq!(index.role.query_value(), Some("director"));
        assert_eq!(index.entries, Region::Loading);
        assert_eq!(index.selected_name(), None);
        index.cycle_role();
        index.cycle_role();
        assert_eq!(index.role, RoleFilter::All);
    }
}
