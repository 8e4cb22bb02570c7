use std::time::Duration;

use super::{Engine, Event};

use crate::{
    entities::Place,
    error::{invalid_input_error, Error},
};

impl Engine {
    /// Destination field changed. Empty text clears suggestions immediately; otherwise
    /// the suggestion list is replaced by the autocomplete answer, unless a newer
    /// keystroke has been seen in the meantime.
    #[tracing::instrument(skip(self))]
    pub async fn set_destination(&self, text: &str) {
        let generation = Self::next_generation(&self.suggestion_generation);

        {
            let mut state = self.state.lock().await;
            state.destination = text.to_string();

            if text.trim().is_empty() {
                if !state.suggestions.is_empty() {
                    state.suggestions.clear();
                    self.events.publish(Event::SuggestionsChanged(Vec::new()));
                }
                return;
            }
        }

        if self.config.suggestion_debounce_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.suggestion_debounce_ms)).await;

            if !Self::is_current(&self.suggestion_generation, generation) {
                tracing::debug!(generation, "superseded before request");
                return;
            }
        }

        let limit = self.config.suggestion_limit;
        let mut places = match self.geocoder.autocomplete(text, limit).await {
            Ok(places) => places,
            Err(err) => {
                tracing::warn!("autocomplete failed: {}", err);
                return;
            }
        };
        places.truncate(limit);

        let mut state = self.state.lock().await;

        if !Self::is_current(&self.suggestion_generation, generation) {
            tracing::debug!(generation, "dropping stale suggestions");
            return;
        }

        state.suggestions = places.clone();
        self.events.publish(Event::SuggestionsChanged(places));
    }

    /// Puts the chosen suggestion's text in the destination field and closes the list.
    #[tracing::instrument(skip(self))]
    pub async fn select_suggestion(&self, index: usize) -> Result<Place, Error> {
        let mut state = self.state.lock().await;

        let place = state
            .suggestions
            .get(index)
            .cloned()
            .ok_or_else(invalid_input_error)?;

        // in-flight autocomplete answers must not reopen the list
        Self::next_generation(&self.suggestion_generation);

        state.destination = place.display_name.clone();
        state.suggestions.clear();
        self.events.publish(Event::SuggestionsChanged(Vec::new()));

        Ok(place)
    }
}
