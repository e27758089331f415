use extend::ext;

use super::TokenId;

#[ext(pub, name = TokenIdsExt)]
impl [TokenId] {
    /// Render the IDs joined by `sep`, e.g. `"4, 5, 6"`.
    fn join_ids(&self, sep: &str) -> String {
        self.iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(sep)
    }
}
