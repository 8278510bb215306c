/// Competition categories, recognised by a substring of the league name.
/// The api crate knows nothing about these; adding one needs no client change.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Category {
    #[default]
    LunarLigaen,
    HhListen,
    FourPlayer,
    All,
}

impl Category {
    pub fn pattern(&self) -> &'static str {
        match self {
            Category::LunarLigaen => "Lunar Ligaen - ",
            Category::HhListen => "HH-Listen",
            Category::FourPlayer => "4P",
            Category::All => "",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::LunarLigaen => "Lunar Ligaen",
            Category::HhListen => "HH-Listen",
            Category::FourPlayer => "4P",
            Category::All => "All",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Category::LunarLigaen => Category::HhListen,
            Category::HhListen => Category::FourPlayer,
            Category::FourPlayer => Category::All,
            Category::All => Category::LunarLigaen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use padel_api::{AllLeagues, League};

    fn leagues(names: &[&str]) -> Vec<League> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| League { id: i as u64, name: (*name).into(), ..Default::default() })
            .collect()
    }

    #[test]
    fn categories_pick_leagues_by_name() {
        let all = AllLeagues {
            horsens: leagues(&["Lunar Ligaen - Herrer", "HH-Listen Forår", "Lunar Ligaen 4P"]),
            stensballe: leagues(&["Lunar Ligaen - Damer", "Sommer 4P Cup"]),
        };
        assert_eq!(all.select(Category::LunarLigaen.pattern()).len(), 2);
        assert_eq!(all.select(Category::HhListen.pattern()).len(), 1);
        assert_eq!(all.select(Category::FourPlayer.pattern()).len(), 2);
        assert_eq!(all.select(Category::All.pattern()).len(), 5);
    }

    #[test]
    fn next_cycles_through_every_category() {
        let mut category = Category::default();
        for _ in 0..4 {
            category = category.next();
        }
        assert_eq!(category, Category::LunarLigaen);
    }
}
