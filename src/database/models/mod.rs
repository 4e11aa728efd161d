pub mod post;
pub mod profile;
pub mod user;

pub use post::{Comment, CommentDraft, Like, Post};
pub use profile::{Education, EducationDraft, Experience, ExperienceDraft, Profile, ProfileFields, ProfileView, Social};
pub use user::{PublicUser, User, UserSummary};
