pub mod auth;
pub mod book;
pub mod feedback;
pub mod principal;
pub mod stats;
pub mod user;

pub use auth::{
    AuthResponse, LoginRequest, MessageResponse, ProfileResponse, RegisterRequest,
    UpdateProfileRequest,
};
pub use book::{Book, BookCreator, CreateBook, UpdateBook};
pub use feedback::{
    CreateFeedback, Feedback, FeedbackBook, FeedbackUser, ModerateFeedback, RatingStats,
    UpdateFeedback,
};
pub use principal::{Credential, Principal, Role, Session};
pub use stats::DashboardStats;
pub use user::{CreateUser, UpdateUser, User};
