//! Pet union.
//!
//! On the wire a pet is one flat JSON object: the shared fields (`name`, `age`)
//! merged with the fields of exactly one variant. In memory the variant is an
//! exhaustive enum so callers never have to guess which payload they hold.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cat {
    pub species: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dog {
    pub species: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetKind {
    Cat(Cat),
    Dog(Dog),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PetWire", into = "PetWire")]
pub struct Pet {
    pub name: Option<String>,
    pub age: Option<i32>,
    kind: PetKind,
}

impl Pet {
    pub fn new(kind: PetKind) -> Self {
        Self {
            name: None,
            age: None,
            kind,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn kind(&self) -> &PetKind {
        &self.kind
    }

    pub fn species(&self) -> &str {
        match &self.kind {
            PetKind::Cat(cat) => &cat.species,
            PetKind::Dog(dog) => &dog.species,
        }
    }

    pub fn as_cat(&self) -> Option<&Cat> {
        match &self.kind {
            PetKind::Cat(cat) => Some(cat),
            PetKind::Dog(_) => None,
        }
    }

    pub fn as_dog(&self) -> Option<&Dog> {
        match &self.kind {
            PetKind::Dog(dog) => Some(dog),
            PetKind::Cat(_) => None,
        }
    }
}

impl From<Cat> for Pet {
    fn from(cat: Cat) -> Self {
        Self::new(PetKind::Cat(cat))
    }
}

impl From<Dog> for Pet {
    fn from(dog: Dog) -> Self {
        Self::new(PetKind::Dog(dog))
    }
}

#[derive(Debug, Error)]
pub enum PetError {
    #[error("pet is missing the 'species' discriminator")]
    MissingSpecies,
}

/// Flattened wire form shared by both variants.
#[derive(Serialize, Deserialize)]
struct PetWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    age: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    species: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    breed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<String>,
}

impl TryFrom<PetWire> for Pet {
    type Error = PetError;

    fn try_from(wire: PetWire) -> Result<Self, Self::Error> {
        let species = wire.species.ok_or(PetError::MissingSpecies)?;

        // Species is free text; only "dog" and the dog-only `size` field pick the Dog variant.
        let kind = if species.eq_ignore_ascii_case("dog") || wire.size.is_some() {
            PetKind::Dog(Dog {
                species,
                breed: wire.breed,
                size: wire.size,
            })
        } else {
            PetKind::Cat(Cat {
                species,
                breed: wire.breed,
            })
        };

        Ok(Self {
            name: wire.name,
            age: wire.age,
            kind,
        })
    }
}

impl From<Pet> for PetWire {
    fn from(pet: Pet) -> Self {
        let (species, breed, size) = match pet.kind {
            PetKind::Cat(cat) => (cat.species, cat.breed, None),
            PetKind::Dog(dog) => (dog.species, dog.breed, dog.size),
        };
        Self {
            name: pet.name,
            age: pet.age,
            species: Some(species),
            breed,
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lab() -> Dog {
        Dog {
            species: "dog".to_string(),
            breed: Some("Lab".to_string()),
            size: Some("large".to_string()),
        }
    }

    #[test]
    fn test_dog_serializes_as_single_flat_object() {
        let pet = Pet::from(lab()).with_name("Rex").with_age(4);
        let value = serde_json::to_value(&pet).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Rex",
                "age": 4,
                "species": "dog",
                "breed": "Lab",
                "size": "large"
            })
        );
    }

    #[test]
    fn test_dog_round_trips_through_variant_accessor() {
        let pet = Pet::from(lab()).with_name("Rex").with_age(4);
        let encoded = serde_json::to_string(&pet).unwrap();
        let decoded: Pet = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.as_dog(), Some(&lab()));
        assert!(decoded.as_cat().is_none());
        assert_eq!(decoded.name.as_deref(), Some("Rex"));
        assert_eq!(decoded.age, Some(4));
    }

    #[test]
    fn test_cat_omits_absent_fields() {
        let pet = Pet::from(Cat {
            species: "cat".to_string(),
            breed: None,
        });
        assert_eq!(serde_json::to_value(&pet).unwrap(), json!({ "species": "cat" }));
    }

    #[test]
    fn test_unknown_species_is_accepted() {
        let pet: Pet = serde_json::from_value(json!({ "species": "ferret", "name": "Bo" })).unwrap();
        assert_eq!(pet.species(), "ferret");
        assert!(pet.as_cat().is_some());
    }

    #[test]
    fn test_size_selects_dog_variant() {
        let pet: Pet = serde_json::from_value(json!({ "species": "wolf", "size": "small" })).unwrap();
        assert_eq!(pet.as_dog().and_then(|d| d.size.as_deref()), Some("small"));
    }

    #[test]
    fn test_species_match_is_case_insensitive() {
        let pet: Pet = serde_json::from_value(json!({ "species": "Dog" })).unwrap();
        assert!(pet.as_dog().is_some());
    }

    #[test]
    fn test_missing_species_fails() {
        let err = serde_json::from_value::<Pet>(json!({ "name": "Rex" })).unwrap_err();
        assert!(err.to_string().contains("species"));
    }

    #[test]
    fn test_non_object_fails() {
        assert!(serde_json::from_value::<Pet>(json!("dog")).is_err());
    }
}
