use chrono::{DateTime, NaiveDate, Utc};
use serde::{ser::Error as _, Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::database::store::{Collection, Document};
use crate::embedded::{EmbeddedItem, EmbeddedList};

use super::user::UserSummary;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub status: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub githubusername: Option<String>,
    #[serde(default)]
    pub social: Social,
    #[serde(default)]
    pub experience: EmbeddedList<Experience>,
    #[serde(default)]
    pub education: EmbeddedList<Education>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Social {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// Scalar profile fields written by create-or-update
#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub status: String,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub social: Social,
}

impl Profile {
    pub fn new(user: Uuid, fields: ProfileFields) -> Self {
        let mut profile = Self {
            id: Uuid::new_v4(),
            user,
            company: None,
            website: None,
            location: None,
            status: String::new(),
            skills: Vec::new(),
            bio: None,
            githubusername: None,
            social: Social::default(),
            experience: EmbeddedList::default(),
            education: EmbeddedList::default(),
            date: Utc::now(),
        };
        profile.apply(fields);
        profile
    }

    /// Overwrite scalar fields; owner, id and embedded lists are left alone.
    /// Absent optional fields keep their stored value, social links are replaced.
    pub fn apply(&mut self, fields: ProfileFields) {
        self.status = fields.status;
        self.skills = fields.skills;
        self.social = fields.social;
        if fields.company.is_some() {
            self.company = fields.company;
        }
        if fields.website.is_some() {
            self.website = fields.website;
        }
        if fields.location.is_some() {
            self.location = fields.location;
        }
        if fields.bio.is_some() {
            self.bio = fields.bio;
        }
        if fields.githubusername.is_some() {
            self.githubusername = fields.githubusername;
        }
    }

    pub fn with_user(self, user: Option<UserSummary>) -> ProfileView {
        ProfileView { user, profile: self }
    }
}

impl Document for Profile {
    const COLLECTION: Collection = Collection::Profiles;

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Profile with `user` expanded to the owner's name and avatar.
/// Falls back to the bare owner id when the user record is gone.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub profile: Profile,
    pub user: Option<UserSummary>,
}

impl Serialize for ProfileView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut value = serde_json::to_value(&self.profile).map_err(S::Error::custom)?;
        if let (Some(map), Some(user)) = (value.as_object_mut(), &self.user) {
            map.insert("user".to_string(), serde_json::to_value(user).map_err(S::Error::custom)?);
        }
        value.serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub from: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExperienceDraft {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

impl EmbeddedItem for Experience {
    type Draft = ExperienceDraft;

    fn assemble(id: Uuid, _owner: Uuid, draft: ExperienceDraft) -> Self {
        Self {
            id,
            title: draft.title,
            company: draft.company,
            location: draft.location,
            from: draft.from,
            to: draft.to,
            current: draft.current,
            description: draft.description,
        }
    }

    fn item_id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> Option<Uuid> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EducationDraft {
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

impl EmbeddedItem for Education {
    type Draft = EducationDraft;

    fn assemble(id: Uuid, _owner: Uuid, draft: EducationDraft) -> Self {
        Self {
            id,
            school: draft.school,
            degree: draft.degree,
            fieldofstudy: draft.fieldofstudy,
            from: draft.from,
            to: draft.to,
            current: draft.current,
            description: draft.description,
        }
    }

    fn item_id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> Option<Uuid> {
        None
    }
}
