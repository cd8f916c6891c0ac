//! The hero being assembled on the character creation screen.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Race {
    Human,
    Kobold,
    Owlin,
    Naga,
}

impl Race {
    pub const ALL: [Race; 4] = [Race::Human, Race::Kobold, Race::Owlin, Race::Naga];

    pub fn name(self) -> &'static str {
        match self {
            Race::Human => "Human",
            Race::Kobold => "Kobold",
            Race::Owlin => "Owlin",
            Race::Naga => "Naga",
        }
    }

    /// One-line flavor text shown in the menu help panel
    pub fn blurb(self) -> &'static str {
        match self {
            Race::Human => "Versatile, gains an extra skill point",
            Race::Kobold => "Small and quick, hard to pin down",
            Race::Owlin => "Sharp-eyed, sees in the dark",
            Race::Naga => "Serpentine, shrugs off poison",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroClass {
    Swordsman,
    Magician,
    Thief,
    Archer,
}

impl HeroClass {
    pub const ALL: [HeroClass; 4] = [
        HeroClass::Swordsman,
        HeroClass::Magician,
        HeroClass::Thief,
        HeroClass::Archer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HeroClass::Swordsman => "Swordsman",
            HeroClass::Magician => "Magician",
            HeroClass::Thief => "Thief",
            HeroClass::Archer => "Archer",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hero {
    pub name: Option<String>,
    pub race: Option<Race>,
    pub class: Option<HeroClass>,
}

impl Hero {
    /// Name, race and class all chosen.
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.race.is_some() && self.class.is_some()
    }

    /// Blank or whitespace-only names are ignored.
    pub fn set_name(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.name = Some(name.to_string());
        true
    }

    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Hero {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {} | Class: {} | Race: {}",
            self.name.as_deref().unwrap_or("None"),
            self.class.map_or("None", HeroClass::name),
            self.race.map_or("None", Race::name),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lists_missing_choices() {
        let mut hero = Hero::default();
        assert_eq!(hero.summary(), "Name: None | Class: None | Race: None");

        hero.race = Some(Race::Owlin);
        assert!(hero.set_name("  Aria "));
        assert_eq!(hero.summary(), "Name: Aria | Class: None | Race: Owlin");
        assert!(!hero.is_complete());

        hero.class = Some(HeroClass::Thief);
        assert!(hero.is_complete());
    }

    #[test]
    fn test_blank_name_is_ignored() {
        let mut hero = Hero::default();
        assert!(!hero.set_name("   "));
        assert_eq!(hero.name, None);
    }
}
