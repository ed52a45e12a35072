// src/db/seed.rs
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::db::repository::{Entity, Repository};
use crate::domain::care_point::{CarePoint, CarePointStatus, CarePointType, NewCarePoint};
use crate::domain::location::Location;
use crate::domain::pet_report::{
    NewPetReport, PetReport, PetReportInput, PetReportStatus, PetReportType, PetType,
};
use crate::domain::shelter::{Shelter, ShelterInput};
use crate::errors::StoreError;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub care_points: usize,
    pub pet_reports: usize,
    pub shelters: usize,
}

/// Insert `drafts` only when the repository holds nothing yet.
pub fn seed_if_empty<E, R>(repo: &R, drafts: Vec<E::Draft>) -> Result<usize, StoreError>
where
    E: Entity,
    R: Repository<E>,
{
    if !repo.list()?.is_empty() {
        return Ok(0);
    }
    let n = drafts.len();
    for draft in drafts {
        repo.create(draft)?;
    }
    info!(entity = E::NAME, count = n, "seeded demo records");
    Ok(n)
}

/// Demo content for a fresh development database. Tables that already hold
/// data are left alone.
pub fn seed_demo_data<C, P, S>(
    care_points: &C,
    pet_reports: &P,
    shelters: &S,
    now: DateTime<Utc>,
) -> Result<SeedSummary, StoreError>
where
    C: Repository<CarePoint>,
    P: Repository<PetReport>,
    S: Repository<Shelter>,
{
    Ok(SeedSummary {
        care_points: seed_if_empty::<CarePoint, _>(care_points, demo_care_points(now))?,
        pet_reports: seed_if_empty::<PetReport, _>(pet_reports, demo_pet_reports(now))?,
        shelters: seed_if_empty::<Shelter, _>(shelters, demo_shelters())?,
    })
}

fn care_point(
    title: &str,
    kind: CarePointType,
    latitude: f64,
    longitude: f64,
    status: CarePointStatus,
    last_updated_at: DateTime<Utc>,
) -> NewCarePoint {
    NewCarePoint {
        title: title.to_string(),
        kind,
        location: Location::new(latitude, longitude),
        status,
        last_updated_at,
    }
}

fn demo_care_points(now: DateTime<Utc>) -> Vec<NewCarePoint> {
    use CarePointStatus as S;
    use CarePointType as T;

    vec![
        care_point("Central Park Feeding Station", T::Food, 40.785091, -73.968285, S::Ok, now - Duration::days(1)),
        care_point("Riverside Water Bowl", T::Water, 40.801979, -73.972080, S::NeedsRefill, now - Duration::days(3)),
        care_point("Community Cat Shelter", T::Shelter, 40.758896, -73.985130, S::Ok, now - Duration::hours(12)),
        care_point("Downtown Dog Food Station", T::Food, 40.712776, -74.005974, S::Broken, now - Duration::days(7)),
        care_point("Brooklyn Bridge Water Point", T::Water, 40.706086, -73.996864, S::Ok, now - Duration::hours(6)),
    ]
}

fn pet_report(
    kind: PetReportType,
    pet_type: PetType,
    description: &str,
    photo_url: Option<&str>,
    latitude: f64,
    longitude: f64,
    created_at: DateTime<Utc>,
) -> NewPetReport {
    NewPetReport {
        fields: PetReportInput {
            kind,
            pet_type,
            description: description.to_string(),
            photo_url: photo_url.map(str::to_string),
            location: Location::new(latitude, longitude),
        },
        status: PetReportStatus::Active,
        created_at,
    }
}

fn demo_pet_reports(now: DateTime<Utc>) -> Vec<NewPetReport> {
    vec![
        pet_report(
            PetReportType::Lost,
            PetType::Dog,
            "Golden Retriever, 3 years old, answers to 'Max'. Last seen near Central Park. Wearing a blue collar with tags.",
            Some("https://images.unsplash.com/photo-1552053831-71594a27632d?w=400"),
            40.782865,
            -73.965355,
            now - Duration::days(2),
        ),
        pet_report(
            PetReportType::Found,
            PetType::Cat,
            "Orange tabby cat found near subway station. Very friendly, seems well-fed. No collar.",
            Some("https://images.unsplash.com/photo-1514888286974-6c03e2ca1dba?w=400"),
            40.750580,
            -73.993584,
            now - Duration::days(1),
        ),
        pet_report(
            PetReportType::Spotted,
            PetType::Dog,
            "Small white poodle spotted wandering alone in the park. Looked scared and hungry.",
            None,
            40.769361,
            -73.977655,
            now - Duration::hours(8),
        ),
        pet_report(
            PetReportType::Lost,
            PetType::Cat,
            "Black and white tuxedo cat, 5 years old. Indoor cat that escaped. Very shy.",
            Some("https://images.unsplash.com/photo-1495360010541-f48722b34f7d?w=400"),
            40.729515,
            -73.998672,
            now - Duration::days(4),
        ),
        pet_report(
            PetReportType::Found,
            PetType::Other,
            "Found a pet rabbit in backyard. Brown and white, very tame. Must be someone's pet.",
            Some("https://images.unsplash.com/photo-1585110396000-c9ffd4e4b308?w=400"),
            40.689247,
            -73.985472,
            now - Duration::hours(18),
        ),
    ]
}

fn shelter(name: &str, phone: &str, address: &str, latitude: f64, longitude: f64) -> ShelterInput {
    ShelterInput {
        name: name.to_string(),
        phone: phone.to_string(),
        address: address.to_string(),
        location: Location::new(latitude, longitude),
    }
}

fn demo_shelters() -> Vec<ShelterInput> {
    vec![
        shelter("Happy Paws Animal Shelter", "(212) 555-0101", "123 Pet Haven Lane, New York, NY 10001", 40.748817, -73.985428),
        shelter("Second Chance Pet Rescue", "(212) 555-0202", "456 Rescue Road, Brooklyn, NY 11201", 40.694065, -73.990432),
        shelter("Furry Friends Foundation", "(212) 555-0303", "789 Animal Avenue, Queens, NY 11375", 40.721070, -73.844749),
        shelter("City Paws Adoption Center", "(212) 555-0404", "321 Adoption Street, Manhattan, NY 10016", 40.746500, -73.979305),
    ]
}
