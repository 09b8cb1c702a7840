//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{Password, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub email: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub password: String,
    pub active: bool,
    pub validated: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User::from_parts(
            model.email,
            Password::from_hash(model.password),
            model.created_at,
            model.updated_at,
            model.active,
            model.validated,
        )
    }
}

/// Every column set, for both insert and full overwrite
impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        ActiveModel {
            email: Set(user.email().to_string()),
            created_at: Set(user.created_at()),
            updated_at: Set(user.updated_at()),
            password: Set(user.password().as_str().to_string()),
            active: Set(user.is_active()),
            validated: Set(user.is_validated()),
        }
    }
}
