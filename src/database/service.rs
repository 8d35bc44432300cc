//! Database service layer
//!
//! This module aggregates the per-entity repositories behind one handle.

use crate::database::{
    BoardRepository, CategoryRepository, CommentRepository, DatabasePool, GoalRepository,
    TgLinkRepository, UserRepository,
};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub boards: BoardRepository,
    pub categories: CategoryRepository,
    pub goals: GoalRepository,
    pub comments: CommentRepository,
    pub tg_links: TgLinkRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            boards: BoardRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool.clone()),
            goals: GoalRepository::new(pool.clone()),
            comments: CommentRepository::new(pool.clone()),
            tg_links: TgLinkRepository::new(pool),
        }
    }
}
