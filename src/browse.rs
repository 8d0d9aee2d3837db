// 🔎 Browse/Filter View - read-only projections for students and the dashboard

use crate::entities::{Club, ClubRegistry, College, CollegeClubs};
use serde::Serialize;

/// What the detail pane shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Nothing,
    Club(Club),
}

impl Selection {
    pub fn club(&self) -> Option<&Club> {
        match self {
            Selection::Club(club) => Some(club),
            Selection::Nothing => None,
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Selection::Nothing)
    }
}

/// Admin dashboard cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub total_clubs: usize,
    pub total_members: u64,
    pub total_events: usize,
}

impl RegistryStats {
    pub fn from_clubs(clubs: &[Club]) -> Self {
        RegistryStats {
            total_clubs: clubs.len(),
            total_members: clubs.iter().map(|c| u64::from(c.member_count)).sum(),
            total_events: clubs.iter().map(|c| c.past_events.len()).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollegeSummary {
    pub college: College,
    pub image_path: &'static str,
    pub club_count: usize,
}

/// Never mutates; every call reads a fresh registry snapshot
#[derive(Clone)]
pub struct BrowseView {
    registry: ClubRegistry,
}

impl BrowseView {
    pub fn new(registry: ClubRegistry) -> Self {
        BrowseView { registry }
    }

    /// Menu entries for one college
    pub fn clubs_for(&self, college: College) -> CollegeClubs {
        self.registry.filter_by_college(college)
    }

    /// Empty/absent id, or one that no longer exists, selects nothing
    pub fn select(&self, id: Option<&str>) -> Selection {
        match id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => self
                .registry
                .find_by_id(id)
                .map_or(Selection::Nothing, Selection::Club),
            None => Selection::Nothing,
        }
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats::from_clubs(&self.registry.snapshot())
    }

    pub fn college_summaries(&self) -> Vec<CollegeSummary> {
        let clubs = self.registry.snapshot();
        College::ALL
            .iter()
            .map(|&college| CollegeSummary {
                college,
                image_path: college.image_path(),
                club_count: clubs.iter().filter(|c| c.college == college).count(),
            })
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
