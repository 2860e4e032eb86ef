use crate::domain::{DangerLevel, Species, SpeciesId};

/// In-memory species reference.
///
/// The contents never change in place; enrichment swaps the whole list through
/// [`SpeciesCatalog::replace`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesCatalog {
    species: Vec<Species>,
}

impl SpeciesCatalog {
    pub fn new(species: Vec<Species>) -> Self {
        Self { species }
    }

    /// The hard-coded seed catalog.
    pub fn seed() -> Self {
        Self::new(seed_species())
    }

    pub fn list_all(&self) -> &[Species] {
        &self.species
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Case-insensitive substring search over common name, scientific name,
    /// family, description and habitat. A blank query returns everything.
    pub fn search(&self, query: &str) -> Vec<&Species> {
        if query.trim().is_empty() {
            return self.species.iter().collect();
        }
        let needle = query.to_lowercase();
        self.species
            .iter()
            .filter(|species| species.matches(&needle))
            .collect()
    }

    pub fn get_by_id(&self, id: SpeciesId) -> Option<&Species> {
        self.species.iter().find(|species| species.id == id)
    }

    pub fn by_danger(&self, level: DangerLevel) -> Vec<&Species> {
        self.species
            .iter()
            .filter(|species| species.danger_level == level)
            .collect()
    }

    /// Full swap; nothing from the previous list survives.
    pub fn replace(&mut self, species: Vec<Species>) {
        self.species = species;
    }
}

impl Default for SpeciesCatalog {
    fn default() -> Self {
        Self::seed()
    }
}

fn unsplash(photo: &str) -> String {
    format!("https://images.unsplash.com/{photo}?auto=format&fit=crop&w=500&q=60")
}

fn regions(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn species(
    id: SpeciesId,
    scientific_name: &str,
    common_name: &str,
    family: &str,
    description: &str,
    habitat: &str,
    photo: &str,
    danger_level: DangerLevel,
    size: &str,
    region: &[&str],
) -> Species {
    Species {
        id,
        scientific_name: scientific_name.to_string(),
        common_name: common_name.to_string(),
        family: family.to_string(),
        description: description.to_string(),
        habitat: habitat.to_string(),
        image_url: unsplash(photo),
        danger_level,
        size: size.to_string(),
        region: regions(region),
    }
}

fn seed_species() -> Vec<Species> {
    vec![
        species(
            1,
            "Argiope aurantia",
            "Black and Yellow Garden Spider",
            "Araneidae",
            "A large, black and yellow spider that builds orb webs in gardens and fields.",
            "Gardens, fields, forests",
            "photo-1582562124811-c09040d0a901",
            DangerLevel::Harmless,
            "19-28mm",
            &["North America", "Central America"],
        ),
        species(
            2,
            "Latrodectus mactans",
            "Black Widow",
            "Theridiidae",
            "Identified by the red hourglass marking on their abdomen, they build irregular webs in secluded spots.",
            "Dark sheltered areas, woodpiles, under rocks",
            "photo-1535268647677-300dbf3d78d1",
            DangerLevel::Dangerous,
            "8-13mm",
            &["North America", "South America"],
        ),
        species(
            3,
            "Loxosceles reclusa",
            "Brown Recluse",
            "Sicariidae",
            "Known for the violin-shaped marking on their thorax, they are reclusive and prefer dark areas.",
            "Indoor areas, closets, attics, cellars",
            "photo-1498936178812-4b2e558d2937",
            DangerLevel::Dangerous,
            "6-12mm",
            &["North America"],
        ),
        species(
            4,
            "Tegenaria domestica",
            "House Spider",
            "Agelenidae",
            "Common indoor spider that builds funnel-like webs in corners.",
            "Houses, garages, outbuildings",
            "photo-1465379944081-7f47de8d74ac",
            DangerLevel::Harmless,
            "7-14mm",
            &["Europe", "North America", "Asia"],
        ),
        species(
            5,
            "Phidippus audax",
            "Bold Jumping Spider",
            "Salticidae",
            "Active hunters with excellent vision, known for their jumping ability.",
            "Gardens, woodlands, urban areas",
            "photo-1472396961693-142e6e269027",
            DangerLevel::Harmless,
            "8-15mm",
            &["North America"],
        ),
        species(
            6,
            "Araneus diadematus",
            "European Garden Spider",
            "Araneidae",
            "Also known as the cross spider, it has cross-shaped markings on its abdomen.",
            "Gardens, woodlands, fields",
            "photo-1439886183900-e79ec0057170",
            DangerLevel::Harmless,
            "6-20mm",
            &["Europe", "North America"],
        ),
        species(
            7,
            "Nephila clavipes",
            "Golden Silk Orb-Weaver",
            "Araneidae",
            "Known for their large, golden-colored webs which can span several meters.",
            "Forests, gardens, along trails",
            "photo-1466721591366-2d5fba72006d",
            DangerLevel::MildlyVenomous,
            "24-40mm",
            &["North America", "South America", "Caribbean"],
        ),
    ]
}
