pub trait AddressExtractor {
    /// Returns every address the given output script pays to, in script order. An empty result means the script is
    /// not one we can attribute to an order.
    fn extract_addresses(&self, script: &[u8]) -> Vec<String>;

    /// The first usable address for the script, if any.
    fn first_address(&self, script: &[u8]) -> Option<String> {
        self.extract_addresses(script).into_iter().find(|a| !a.is_empty())
    }
}
