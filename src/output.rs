use std::io::{self, Write};

use serde::Serialize;

use crate::app::{
    DeleteResult, EncounterDetail, EncounterListResult, EncounterView, LogResult, SpeciesDetail,
    SpeciesListResult, Summary,
};
use crate::domain::{Encounter, Species};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Human,
    Json,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

pub struct TextOutput;

impl TextOutput {
    pub fn species_list(result: &SpeciesListResult) -> String {
        if result.species.is_empty() {
            return "No spiders found.\n".to_string();
        }
        let mut out = format!("Showing {} species\n", result.species.len());
        for species in &result.species {
            out.push_str(&format!(
                "{:>3}  {} ({}) [{}]\n",
                species.id, species.common_name, species.scientific_name, species.danger_level
            ));
        }
        out
    }

    pub fn species_detail(detail: &SpeciesDetail) -> String {
        let mut out = species_card(&detail.species);
        if detail.encounters.is_empty() {
            out.push_str("\nNo encounters logged yet.\n");
        } else {
            out.push_str(&format!("\nEncounters ({}):\n", detail.encounters.len()));
            for encounter in &detail.encounters {
                out.push_str(&format!("  {}\n", encounter_line(encounter, None)));
            }
        }
        out
    }

    pub fn encounter_list(result: &EncounterListResult) -> String {
        if result.encounters.is_empty() {
            return "No encounters found.\n".to_string();
        }
        result
            .encounters
            .iter()
            .map(|view| format!("{}\n", view_line(view)))
            .collect()
    }

    pub fn encounter_detail(detail: &EncounterDetail) -> String {
        let encounter = &detail.encounter;
        let mut out = format!("Encounter {}\n", encounter.id);
        match &detail.species {
            Some(species) => out.push_str(&format!(
                "Spider:     {} ({})\n",
                species.common_name, species.scientific_name
            )),
            None => out.push_str(&format!(
                "Spider:     unknown species #{}\n",
                encounter.spider_id
            )),
        }
        out.push_str(&format!("Date:       {}\n", encounter.date.format("%Y-%m-%d %H:%M")));
        out.push_str(&format!("Location:   {}\n", encounter.location));
        if let Some(coords) = encounter.coordinates {
            out.push_str(&format!(
                "Coords:     {:.5}, {:.5}\n",
                coords.latitude, coords.longitude
            ));
        }
        if !encounter.companions.is_empty() {
            out.push_str(&format!("Companions: {}\n", encounter.companions.join(", ")));
        }
        if !encounter.notes.is_empty() {
            out.push_str(&format!("Notes:      {}\n", encounter.notes));
        }
        if let Some(photos) = &encounter.photos {
            for photo in photos {
                out.push_str(&format!("Photo:      {photo}\n"));
            }
        }
        out
    }

    pub fn logged(result: &LogResult) -> String {
        match &result.encounter {
            Some(encounter) => format!("Encounter logged successfully: {}\n", encounter.id),
            None => "Encounter could not be saved; check the log and list encounters to confirm.\n"
                .to_string(),
        }
    }

    pub fn deleted(result: &DeleteResult) -> String {
        format!("Encounter deleted: {}\n", result.id)
    }

    pub fn summary(summary: &Summary) -> String {
        let mut out = format!(
            "Storage: {}\nSpecies in catalog: {}\nEncounters logged: {}\nSpecies seen: {}\n",
            summary.backend, summary.catalog_size, summary.total_encounters, summary.species_seen
        );
        if !summary.recent.is_empty() {
            out.push_str("\nRecent encounters:\n");
            for view in &summary.recent {
                out.push_str(&format!("  {}\n", view_line(view)));
            }
        }
        out
    }
}

fn species_card(species: &Species) -> String {
    format!(
        "{} ({})\nFamily:  {}\nDanger:  {}\nSize:    {}\nHabitat: {}\nRegions: {}\n\n{}\n",
        species.common_name,
        species.scientific_name,
        species.family,
        species.danger_level,
        species.size,
        species.habitat,
        species.region.join(", "),
        species.description
    )
}

fn view_line(view: &EncounterView) -> String {
    encounter_line(&view.encounter, view.species_name.as_deref())
}

fn encounter_line(encounter: &Encounter, species_name: Option<&str>) -> String {
    let mut line = format!(
        "{}  {}  {}",
        encounter.date.format("%Y-%m-%d"),
        encounter.id,
        encounter.location
    );
    if let Some(name) = species_name {
        line.push_str(&format!("  ({name})"));
    }
    if !encounter.companions.is_empty() {
        line.push_str(&format!("  with {}", encounter.companions.join(", ")));
    }
    line
}
