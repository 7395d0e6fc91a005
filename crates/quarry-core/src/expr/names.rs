//! Canonical operator and attribute spellings in the expression tree.

// logical / collection operators
pub const AND: &str = "and";
pub const OR: &str = "or";
pub const NOT: &str = "not";
pub const ANY: &str = "any";
pub const ALL: &str = "all";
pub const COUNT: &str = "count";

// path and map plumbing
pub const DOT: &str = ".";
pub const AS: &str = "as";
pub const PARAMETER: &str = "parameter";
pub const ELEMENTS_OF_TYPE: &str = "elementsOfType";

// pseudo-attributes
pub const THIS: &str = "this";
pub const VALUE: &str = "value";

// per-user "mine" prefix
pub const MY_PREFIX: &str = "my";

// comparisons
pub const EQ: &str = "==";
pub const NE: &str = "!=";
pub const LT: &str = "<";
pub const LTE: &str = "<=";
pub const GT: &str = ">";
pub const GTE: &str = ">=";
pub const MATCHES: &str = "=~";
pub const NOT_MATCHES: &str = "!~";
pub const MATCHES_CI: &str = "=~~";
pub const NOT_MATCHES_CI: &str = "!~~";
pub const IS_NULL: &str = "isnull";
