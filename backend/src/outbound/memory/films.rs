//! Film repository over the in-memory state.

use async_trait::async_trait;

use crate::domain::ports::{FilmRepository, FilmRepositoryError};
use crate::domain::{Film, FilmDraft, FilmId, UserId};

use super::{LockPoisoned, MemoryStore};

fn poisoned(err: LockPoisoned) -> FilmRepositoryError {
    FilmRepositoryError::query(err.to_string())
}

#[async_trait]
impl FilmRepository for MemoryStore {
    async fn create(&self, draft: &FilmDraft) -> Result<Film, FilmRepositoryError> {
        let mut state = self.write().map_err(poisoned)?;
        let id = match draft.id {
            Some(id) if state.films.contains_key(&id) => {
                return Err(FilmRepositoryError::duplicate(id));
            }
            Some(id) => id,
            None => self.film_ids.allocate(),
        };
        let film = state
            .resolve_film(id, draft)
            .map_err(FilmRepositoryError::unknown_reference)?;
        self.film_ids.observe(id);
        state.films.insert(id, film.clone());
        Ok(film)
    }

    async fn update(&self, id: FilmId, draft: &FilmDraft) -> Result<Film, FilmRepositoryError> {
        let mut state = self.write().map_err(poisoned)?;
        if !state.films.contains_key(&id) {
            return Err(FilmRepositoryError::not_found(id));
        }
        let film = state
            .resolve_film(id, draft)
            .map_err(FilmRepositoryError::unknown_reference)?;
        state.films.insert(id, film.clone());
        Ok(state.film_view(&film))
    }

    async fn delete(&self, id: FilmId) -> Result<(), FilmRepositoryError> {
        let mut state = self.write().map_err(poisoned)?;
        state
            .remove_film(id)
            .map(|_| ())
            .ok_or_else(|| FilmRepositoryError::not_found(id))
    }

    async fn find_by_id(&self, id: FilmId) -> Result<Option<Film>, FilmRepositoryError> {
        let state = self.read().map_err(poisoned)?;
        Ok(state.films.get(&id).map(|film| state.film_view(film)))
    }

    async fn list(&self) -> Result<Vec<Film>, FilmRepositoryError> {
        let state = self.read().map_err(poisoned)?;
        Ok(state
            .films
            .values()
            .map(|film| state.film_view(film))
            .collect())
    }

    async fn add_like(&self, film_id: FilmId, user_id: UserId) -> Result<(), FilmRepositoryError> {
        let mut state = self.write().map_err(poisoned)?;
        if !state.films.contains_key(&film_id) {
            return Err(FilmRepositoryError::not_found(film_id));
        }
        if !state.users.contains_key(&user_id) {
            return Err(FilmRepositoryError::unknown_reference(format!(
                "user {user_id} not found"
            )));
        }
        state.likes.insert(film_id, user_id);
        Ok(())
    }

    async fn remove_like(
        &self,
        film_id: FilmId,
        user_id: UserId,
    ) -> Result<(), FilmRepositoryError> {
        let mut state = self.write().map_err(poisoned)?;
        if !state.films.contains_key(&film_id) {
            return Err(FilmRepositoryError::not_found(film_id));
        }
        state.likes.remove(&film_id, &user_id);
        Ok(())
    }
}
