// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{Chef, ChefId};
use crate::database::query;
use diesel::result::QueryResult;

/// The chef who is logged in. Handed to whatever needs to act on their behalf; logging out is
/// dropping it.
#[derive(Clone, Debug, PartialEq)]
pub struct AppSession {
    chef: Chef,
}

impl AppSession {
    pub fn login(
        conn: &mut database::Connection,
        email: &str,
        password: &str,
    ) -> QueryResult<Option<Self>> {
        let chef = query::find_chef_by_credentials(conn, email.trim(), password)?;
        match &chef {
            Some(chef) => log::info!("chef {} logged in", chef.id),
            None => log::info!("failed login for {:?}", email.trim()),
        }
        Ok(chef.map(|chef| Self { chef }))
    }

    pub fn chef(&self) -> &Chef {
        &self.chef
    }

    pub fn chef_id(&self) -> ChefId {
        self.chef.id
    }

    /// Re-reads the chef's row. Returns `false` if the chef no longer exists.
    pub fn refresh(&mut self, conn: &mut database::Connection) -> QueryResult<bool> {
        match query::get_chef(conn, self.chef.id)? {
            Some(chef) => {
                self.chef = chef;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
