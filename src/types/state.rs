use std::fmt::Debug;

/// State carried through a graph run.
///
/// Nodes either replace the state wholesale or emit typed updates that the
/// executor applies in order. Usually derived with `#[derive(State)]`.
pub trait GraphState: Debug + Clone + Send + Sync + 'static {
    type Update: Debug + Send;

    /// Apply a single update.
    fn apply(&mut self, update: Self::Update);

    /// Apply updates in sequence.
    fn apply_many<I: IntoIterator<Item = Self::Update>>(&mut self, updates: I) {
        for update in updates {
            self.apply(update);
        }
    }
}
