use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            Serialize,
            Deserialize,
            ToSchema,
            JsonSchema,
            Eq,
            PartialEq,
            Ord,
            PartialOrd,
            Hash,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}
id_newtype!(TeacherId);
id_newtype!(SubjectId);
id_newtype!(ClassId);
id_newtype!(RoomId);
id_newtype!(TimeslotId);

/// Number of school days in the weekly grid (Mon..Fri).
pub const DAYS_PER_WEEK: u8 = 5;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq, Hash)]
pub struct Qualification {
    pub teacher_id: TeacherId,
    pub subject_id: SubjectId,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
pub struct ClassGroup {
    pub id: ClassId,
    pub name: String,
    pub size: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub capacity: u32,
    #[serde(default)]
    pub has_projector: bool,
    #[serde(default)]
    pub has_smart_board: bool,
}

/// One cell of the weekly grid. `day` is 0 (Mon) through 4 (Fri).
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
pub struct TimeSlot {
    pub id: TimeslotId,
    pub day: u8,
    pub slot: u8,
    #[serde(default)]
    pub label: String,
}

impl TimeSlot {
    /// Grid position; the grid is walked in ascending order of this key.
    pub fn grid_key(&self) -> (u8, u8) {
        (self.day, self.slot)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
pub struct SubjectRequirement {
    pub class_id: ClassId,
    pub subject_id: SubjectId,
    pub periods_per_week: i32,
}

#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq, Hash,
)]
pub struct Assignment {
    pub class_id: ClassId,
    pub timeslot_id: TimeslotId,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub room_id: RoomId,
}

/// Everything a generation run reads. Loaded by the caller and treated as
/// read-only for the duration of the run.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
pub struct Snapshot {
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub qualifications: Vec<Qualification>,
    #[serde(default)]
    pub classes: Vec<ClassGroup>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub timeslots: Vec<TimeSlot>,
    #[serde(default)]
    pub requirements: Vec<SubjectRequirement>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AllocatorKind {
    #[default]
    Greedy,
    Milp,
}

/// Resolved inputs of one generation run.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
pub struct GenerateParams {
    pub allocator: AllocatorKind,
    pub seed: u64,
}

impl Default for GenerateParams {
    fn default() -> Self {
        Self {
            allocator: AllocatorKind::default(),
            seed: 42,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
pub struct Stats {
    pub placed: u32,
    pub needed: u32,
}

/// Obligations of one (class, subject) that no timeslot could take.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
pub struct UnmetDemand {
    pub class_id: ClassId,
    pub subject_id: SubjectId,
    pub missing: u32,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenerateStatus {
    Complete,
    Partial,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
pub struct GenerateResult {
    pub status: GenerateStatus,
    pub allocator: String,
    pub assignments: Vec<Assignment>,
    pub stats: Stats,
    #[serde(default)]
    pub unmet: Vec<UnmetDemand>,
}

/// Manual single-slot edit. The target cell is addressed by grid position.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq, Eq)]
pub struct OverrideRequest {
    pub class_id: ClassId,
    pub day: u8,
    pub slot: u8,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub room_id: RoomId,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Violation {
    pub r#type: String,
    pub details: serde_json::Value,
}
