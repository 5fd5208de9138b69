//! Talent service - roster CRUD and evaluations

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use uuid::Uuid;

use crate::domain::result::Error;
use crate::domain::talent::MAX_RATING;
use crate::domain::Talent;
use crate::import::reconcile::find_match;
use crate::ports::TalentStore;

/// Roster ordering for listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TalentSort {
    /// Stored order
    #[default]
    Roster,
    Name,
    /// Highest rating first
    Rating,
    /// Highest annual sales first
    Sales,
}

impl FromStr for TalentSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "roster" => Ok(TalentSort::Roster),
            "name" => Ok(TalentSort::Name),
            "rating" => Ok(TalentSort::Rating),
            "sales" => Ok(TalentSort::Sales),
            _ => Err(format!("unknown sort '{}' (expected roster, name, rating or sales)", s)),
        }
    }
}

impl fmt::Display for TalentSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TalentSort::Roster => "roster",
            TalentSort::Name => "name",
            TalentSort::Rating => "rating",
            TalentSort::Sales => "sales",
        };
        f.write_str(s)
    }
}

/// Talent service for roster management
pub struct TalentService {
    store: Arc<dyn TalentStore>,
}

impl TalentService {
    pub fn new(store: Arc<dyn TalentStore>) -> Self {
        Self { store }
    }

    pub fn list(&self, sort: TalentSort) -> Result<Vec<Talent>> {
        let mut talents = self.store.load_talents()?;
        match sort {
            TalentSort::Roster => {}
            TalentSort::Name => talents.sort_by(|a, b| a.name.cmp(&b.name)),
            TalentSort::Rating => {
                talents.sort_by(|a, b| b.rating.cmp(&a.rating).then_with(|| a.name.cmp(&b.name)))
            }
            TalentSort::Sales => {
                talents.sort_by(|a, b| b.sales.cmp(&a.sales).then_with(|| a.name.cmp(&b.name)))
            }
        }
        Ok(talents)
    }

    /// Find a talent by id, exact name, or name containment
    pub fn find(&self, query: &str) -> Result<Option<Talent>> {
        let talents = self.store.load_talents()?;
        if let Ok(id) = Uuid::parse_str(query.trim()) {
            return Ok(talents.into_iter().find(|t| t.id == id));
        }
        let query = query.trim();
        let index = talents
            .iter()
            .position(|t| t.name.trim() == query)
            .or_else(|| find_match(&talents, query));
        Ok(index.map(|i| talents[i].clone()))
    }

    /// Like [`find`](Self::find) but failing when nothing matches
    pub fn get(&self, query: &str) -> Result<Talent> {
        self.find(query)?
            .ok_or_else(|| Error::not_found(format!("talent '{}'", query)).into())
    }

    /// Add a new talent to the end of the roster
    pub fn add(&self, talent: Talent) -> Result<Talent> {
        if let Err(msg) = talent.validate() {
            return Err(Error::validation(msg).into());
        }
        let existing = self.store.load_talents()?;
        if existing.iter().any(|t| t.id == talent.id) {
            return Err(Error::validation(format!("talent {} already exists", talent.id)).into());
        }
        self.store.upsert_talent(&talent)?;
        Ok(talent)
    }

    /// Save changes to an existing talent
    pub fn update(&self, mut talent: Talent) -> Result<Talent> {
        if let Err(msg) = talent.validate() {
            return Err(Error::validation(msg).into());
        }
        if !self.store.load_talents()?.iter().any(|t| t.id == talent.id) {
            return Err(Error::not_found(format!("talent {}", talent.id)).into());
        }
        talent.touch();
        self.store.upsert_talent(&talent)?;
        Ok(talent)
    }

    /// Remove a talent, returning whether it existed
    pub fn remove(&self, id: Uuid) -> Result<bool> {
        Ok(self.store.delete_talent(id)?)
    }

    /// Record an evaluation (rating 0-5 plus an optional note)
    pub fn evaluate(&self, query: &str, rating: u8, note: Option<&str>) -> Result<Talent> {
        if rating > MAX_RATING {
            return Err(Error::validation(format!("rating must be between 0 and {}", MAX_RATING)).into());
        }
        let mut talent = self.get(query)?;
        talent.rating = rating;
        if let Some(note) = note {
            talent.evaluation_note = note.trim().to_string();
        }
        self.update(talent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;

    fn service_with(names: &[(&str, u8, i64)]) -> TalentService {
        let store = Arc::new(MemoryStore::new());
        let talents: Vec<Talent> = names
            .iter()
            .map(|(name, rating, sales)| {
                let mut t = Talent::new(Uuid::new_v4(), *name);
                t.rating = *rating;
                t.sales = *sales;
                t
            })
            .collect();
        store.save_talents(&talents).unwrap();
        TalentService::new(store)
    }

    #[test]
    fn test_list_sorting() {
        let service = service_with(&[("Carol", 2, 300), ("Alice", 5, 100), ("Bob", 5, 200)]);

        let names = |sort| -> Vec<String> {
            service.list(sort).unwrap().into_iter().map(|t| t.name).collect()
        };
        assert_eq!(names(TalentSort::Roster), vec!["Carol", "Alice", "Bob"]);
        assert_eq!(names(TalentSort::Name), vec!["Alice", "Bob", "Carol"]);
        assert_eq!(names(TalentSort::Rating), vec!["Alice", "Bob", "Carol"]);
        assert_eq!(names(TalentSort::Sales), vec!["Carol", "Bob", "Alice"]);
    }

    #[test]
    fn test_find_by_id_and_name() {
        let service = service_with(&[("山田太郎", 0, 0), ("田中美咲", 0, 0)]);
        let tanaka = service.find("田中美咲").unwrap().unwrap();

        assert_eq!(service.find(&tanaka.id.to_string()).unwrap().unwrap().name, "田中美咲");
        assert_eq!(service.find("山田").unwrap().unwrap().name, "山田太郎");
        assert!(service.find("鈴木").unwrap().is_none());
        let err = service.get("鈴木").unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NotFound(_))));
    }

    #[test]
    fn test_add_validates() {
        let service = service_with(&[]);
        assert!(service.add(Talent::new(Uuid::new_v4(), "  ")).is_err());

        let talent = service.add(Talent::new(Uuid::new_v4(), "新人")).unwrap();
        assert!(service.add(talent).is_err());
        assert_eq!(service.list(TalentSort::Roster).unwrap().len(), 1);
    }

    #[test]
    fn test_evaluate() {
        let service = service_with(&[("山田太郎", 0, 0)]);

        let updated = service.evaluate("山田太郎", 4, Some(" 演技力向上 ")).unwrap();
        assert_eq!(updated.rating, 4);
        assert_eq!(updated.evaluation_note, "演技力向上");
        assert!(updated.updated_at >= updated.created_at);

        let err = service.evaluate("山田太郎", 6, None).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Validation(_))));
        assert_eq!(service.get("山田太郎").unwrap().rating, 4);
    }

    #[test]
    fn test_update_and_remove() {
        let service = service_with(&[("A", 0, 0)]);
        let mut a = service.get("A").unwrap();
        a.email = "a@example.com".to_string();
        service.update(a.clone()).unwrap();
        assert_eq!(service.get("A").unwrap().email, "a@example.com");

        assert!(service.remove(a.id).unwrap());
        assert!(service.update(a).is_err());
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!("Rating".parse::<TalentSort>().unwrap(), TalentSort::Rating);
        assert!("age".parse::<TalentSort>().is_err());
    }
}
