//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod board;
pub mod category;
pub mod comment;
pub mod goal;
pub mod tg_link;
pub mod user;

// Re-export commonly used models
pub use board::{
    Board, BoardDetail, BoardParticipant, CreateBoardRequest, ParticipantSpec, Role, SharingDiff,
    UpdateBoardRequest,
};
pub use category::{CreateCategoryRequest, GoalCategory, UpdateCategoryRequest};
pub use comment::{CreateCommentRequest, GoalComment, UpdateCommentRequest};
pub use goal::{CreateGoalRequest, Goal, GoalPriority, GoalStatus, UpdateGoalRequest};
pub use tg_link::{TgLink, VerifyRequest};
pub use user::{
    CreateUserRequest, LoginRequest, LoginResponse, Profile, SignupRequest,
    UpdatePasswordRequest, UpdateProfileRequest, User,
};
