//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    /// Keys of a section, sorted, empty when the section is absent. Used to
    /// pass whole `[strategy.*]` sections through as strategy parameters.
    fn section_keys(&self, section: &str) -> Vec<String>;
}
