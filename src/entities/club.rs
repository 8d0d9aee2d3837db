// 🎓 Club Entity - stable identity + replaceable values
//
// "The id is IDENTITY (never changes), everything else is a VALUE the admin can edit"
//
// - id is assigned once, at creation, and survives every edit
// - past events belong to their club and only disappear with it
// - the registry hands out snapshots, so a reader never sees half a mutation

use super::college::College;
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

// ============================================================================
// PAST EVENT
// ============================================================================

/// Historical activity of a club. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PastEvent {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub description: String,
    pub participants: u32,
}

impl PastEvent {
    pub fn new(title: String, date: NaiveDate, description: String, participants: u32) -> Self {
        PastEvent {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            date,
            description,
            participants,
        }
    }
}

// ============================================================================
// CLUB FIELDS (everything an admin can edit)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubFields {
    pub college: College,
    pub name: String,
    pub description: String,
    pub registration_link: String,
    pub founding_year: i32,
    pub member_count: u32,
}

impl Default for ClubFields {
    /// The blank "Add club" form
    fn default() -> Self {
        ClubFields {
            college: College::Ggits,
            name: String::new(),
            description: String::new(),
            registration_link: String::new(),
            founding_year: Utc::now().year(),
            member_count: 0,
        }
    }
}

impl ClubFields {
    /// Text fields with surrounding whitespace removed, as they are stored
    pub fn normalized(self) -> Self {
        ClubFields {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            registration_link: self.registration_link.trim().to_string(),
            ..self
        }
    }
}

impl From<&Club> for ClubFields {
    /// Pre-fills the "Edit club" form
    fn from(club: &Club) -> Self {
        ClubFields {
            college: club.college,
            name: club.name.clone(),
            description: club.description.clone(),
            registration_link: club.registration_link.clone(),
            founding_year: club.founding_year,
            member_count: club.member_count,
        }
    }
}

// ============================================================================
// CLUB ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    // ========================================================================
    // IDENTITY (never changes)
    // ========================================================================
    pub id: String,

    // ========================================================================
    // VALUES (replaced wholesale on edit)
    // ========================================================================
    pub college: College,
    pub name: String,
    pub description: String,

    /// External form the student is sent to after a successful submission
    pub registration_link: String,

    pub founding_year: i32,
    pub member_count: u32,

    // ========================================================================
    // OWNED HISTORY (display order = insertion order)
    // ========================================================================
    pub past_events: Vec<PastEvent>,
}

impl Club {
    /// Create new club with a fresh UUID and no history
    pub fn new(fields: ClubFields) -> Self {
        Club::with_id(uuid::Uuid::new_v4().to_string(), fields, Vec::new())
    }

    pub fn with_id(id: String, fields: ClubFields, past_events: Vec<PastEvent>) -> Self {
        Club {
            id,
            college: fields.college,
            name: fields.name,
            description: fields.description,
            registration_link: fields.registration_link,
            founding_year: fields.founding_year,
            member_count: fields.member_count,
            past_events,
        }
    }

    /// Replace every editable value; id and past events are kept
    pub fn apply(&mut self, fields: ClubFields) {
        self.college = fields.college;
        self.name = fields.name;
        self.description = fields.description;
        self.registration_link = fields.registration_link;
        self.founding_year = fields.founding_year;
        self.member_count = fields.member_count;
    }

    pub fn fields(&self) -> ClubFields {
        ClubFields::from(self)
    }

    pub fn total_participants(&self) -> u64 {
        self.past_events.iter().map(|e| u64::from(e.participants)).sum()
    }
}

// ============================================================================
// CLUB REGISTRY
// ============================================================================

/// The authoritative in-memory list of clubs.
///
/// Cloning a registry shares the same list and the same mutation slot. Reads
/// are unrestricted; writes are crate-private so that
/// [`crate::mutator::RegistryMutator`] stays the only writer. Every write swaps
/// in a new list under the lock, readers holding an older snapshot keep seeing
/// the list as it was when they took it.
///
/// Contents reset to the seed clubs on every process start.
#[derive(Clone)]
pub struct ClubRegistry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    clubs: RwLock<Arc<Vec<Club>>>,
    /// Set while any mutator is working on this registry
    mutating: AtomicBool,
}

impl ClubRegistry {
    /// Create new registry with the seed clubs
    pub fn new() -> Self {
        ClubRegistry::from_clubs(default_clubs())
    }

    pub fn empty() -> Self {
        ClubRegistry::from_clubs(Vec::new())
    }

    pub fn from_clubs(clubs: Vec<Club>) -> Self {
        ClubRegistry {
            inner: Arc::new(RegistryInner {
                clubs: RwLock::new(Arc::new(clubs)),
                mutating: AtomicBool::new(false),
            }),
        }
    }

    /// Consistent view of the whole list at this instant
    pub fn snapshot(&self) -> Arc<Vec<Club>> {
        let guard = self.inner.clubs.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// All clubs, in insertion order
    pub fn list(&self) -> Vec<Club> {
        self.snapshot().as_ref().clone()
    }

    pub fn find_by_id(&self, id: &str) -> Option<Club> {
        self.snapshot().iter().find(|c| c.id == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.snapshot().iter().any(|c| c.id == id)
    }

    /// Lazy, restartable walk over the clubs of one college
    pub fn filter_by_college(&self, college: College) -> CollegeClubs {
        CollegeClubs::new(self.snapshot(), college)
    }

    pub fn count(&self) -> usize {
        self.snapshot().len()
    }

    /// True while a mutation on this registry is in flight
    pub fn is_mutating(&self) -> bool {
        self.inner.mutating.load(Ordering::Acquire)
    }

    // ========================================================================
    // WRITE PATH (RegistryMutator only)
    // ========================================================================

    /// The single in-flight slot shared by every mutator over this registry
    pub(crate) fn mutation_slot(&self) -> &AtomicBool {
        &self.inner.mutating
    }

    fn write<R>(&self, mutate: impl FnOnce(&mut Vec<Club>) -> R) -> R {
        let mut guard = self.inner.clubs.write().unwrap_or_else(PoisonError::into_inner);
        mutate(Arc::make_mut(&mut *guard))
    }

    /// Append a club. Refuses (returns false) if the id is already taken.
    pub(crate) fn insert(&self, club: Club) -> bool {
        self.write(|clubs| {
            if clubs.iter().any(|c| c.id == club.id) {
                return false;
            }
            clubs.push(club);
            true
        })
    }

    /// Replace the editable values of one club, returning the updated record
    pub(crate) fn replace(&self, id: &str, fields: ClubFields) -> Option<Club> {
        self.write(|clubs| {
            let club = clubs.iter_mut().find(|c| c.id == id)?;
            club.apply(fields);
            Some(club.clone())
        })
    }

    /// Hard removal, no tombstone
    pub(crate) fn remove(&self, id: &str) -> Option<Club> {
        self.write(|clubs| {
            let index = clubs.iter().position(|c| c.id == id)?;
            Some(clubs.remove(index))
        })
    }
}

impl Default for ClubRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// COLLEGE FILTER
// ============================================================================

/// Iterator over the clubs of one college, backed by a registry snapshot.
///
/// Finite. Clone it before iterating, or call [`CollegeClubs::restart`], to
/// walk the same subset again.
#[derive(Debug, Clone)]
pub struct CollegeClubs {
    clubs: Arc<Vec<Club>>,
    college: College,
    position: usize,
}

impl CollegeClubs {
    fn new(clubs: Arc<Vec<Club>>, college: College) -> Self {
        CollegeClubs {
            clubs,
            college,
            position: 0,
        }
    }

    pub fn college(&self) -> College {
        self.college
    }

    pub fn restart(&mut self) {
        self.position = 0;
    }
}

impl Iterator for CollegeClubs {
    type Item = Club;

    fn next(&mut self) -> Option<Club> {
        while let Some(club) = self.clubs.get(self.position) {
            self.position += 1;
            if club.college == self.college {
                return Some(club.clone());
            }
        }
        None
    }
}

// ============================================================================
// SEED DATA
// ============================================================================

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn seed_event(
    id: &str,
    title: &str,
    date: NaiveDate,
    description: &str,
    participants: u32,
) -> PastEvent {
    PastEvent {
        id: id.to_string(),
        title: title.to_string(),
        date,
        description: description.to_string(),
        participants,
    }
}

#[allow(clippy::too_many_arguments)]
fn seed_club(
    id: &str,
    college: College,
    name: &str,
    description: &str,
    registration_link: &str,
    founding_year: i32,
    member_count: u32,
    past_events: Vec<PastEvent>,
) -> Club {
    Club::with_id(
        id.to_string(),
        ClubFields {
            college,
            name: name.to_string(),
            description: description.to_string(),
            registration_link: registration_link.to_string(),
            founding_year,
            member_count,
        },
        past_events,
    )
}

/// The six clubs every process starts with
pub fn default_clubs() -> Vec<Club> {
    vec![
        // 1. AI & ML Club
        seed_club(
            "1",
            College::Ggits,
            "AI & ML Club",
            "Explore the fascinating world of Artificial Intelligence and Machine Learning. \
             Work on cutting-edge projects, learn from industry experts, and build innovative \
             solutions using the latest AI technologies.",
            "https://forms.gle/abcd123",
            2019,
            150,
            vec![
                seed_event(
                    "1",
                    "AI Workshop 2024",
                    ymd(2024, 3, 15),
                    "Introduction to Machine Learning algorithms and practical implementation",
                    85,
                ),
                seed_event(
                    "2",
                    "Hackathon AI Challenge",
                    ymd(2024, 1, 20),
                    "Build AI solutions for real-world problems in 48 hours",
                    120,
                ),
            ],
        ),
        // 2. Coding Club
        seed_club(
            "2",
            College::Ggits,
            "Coding Club",
            "Enhance your programming skills through competitive coding, hackathons, and \
             collaborative projects. Join a community of passionate developers and level up \
             your coding expertise.",
            "https://forms.gle/xyz789",
            2018,
            200,
            vec![seed_event(
                "3",
                "CodeFest 2024",
                ymd(2024, 2, 10),
                "Annual coding competition with multiple programming challenges",
                180,
            )],
        ),
        // 3. Web Development Club
        seed_club(
            "3",
            College::Ggce,
            "Web Development Club",
            "Work on real-world web projects using modern frameworks and technologies. Learn \
             full-stack development, UI/UX design, and deploy applications that make a \
             difference.",
            "https://forms.gle/efgh456",
            2020,
            130,
            vec![seed_event(
                "4",
                "Web Dev Bootcamp",
                ymd(2024, 4, 5),
                "Intensive 3-day bootcamp covering React, Node.js, and MongoDB",
                95,
            )],
        ),
        // 4. Environmental Club
        seed_club(
            "4",
            College::Ggce,
            "Environmental Club",
            "Join our mission to create a sustainable future. Participate in eco-friendly \
             initiatives, awareness campaigns, and environmental research projects that \
             benefit our community.",
            "https://forms.gle/env123",
            2017,
            80,
            vec![seed_event(
                "5",
                "Green Campus Initiative",
                ymd(2024, 3, 22),
                "Tree plantation drive and waste management awareness program",
                150,
            )],
        ),
        // 5. Robotics Club
        seed_club(
            "5",
            College::Ggct,
            "Robotics Club",
            "Build robots and automation tools that solve real-world problems. Engage in \
             hands-on projects involving sensors, microcontrollers, and advanced robotics \
             technologies.",
            "https://forms.gle/ijkl789",
            2019,
            110,
            vec![seed_event(
                "6",
                "Robo Wars 2024",
                ymd(2024, 2, 28),
                "Robot fighting competition with custom-built combat robots",
                75,
            )],
        ),
        // 6. Innovation Club
        seed_club(
            "6",
            College::Ggct,
            "Innovation Club",
            "Foster creativity and innovation through interdisciplinary projects. Collaborate \
             with students from various fields to develop breakthrough solutions and \
             entrepreneurial ventures.",
            "https://forms.gle/innov456",
            2021,
            90,
            vec![seed_event(
                "7",
                "Innovation Summit",
                ymd(2024, 1, 15),
                "Showcase of innovative student projects and startup pitches",
                200,
            )],
        ),
    ]
}

// ============================================================================
// TESTS
// ============================================================================
