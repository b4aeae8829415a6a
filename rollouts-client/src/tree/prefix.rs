/// Returns the branch prefix for a child line and the prefix its own
/// children continue from. `sub_prefix` is the continuation prefix of the
/// parent; the root is drawn without any prefix.
pub fn prefix_for(is_last: bool, sub_prefix: &str) -> (String, String) {
    if is_last {
        (format!("{sub_prefix}└──"), format!("{sub_prefix}   "))
    } else {
        (format!("{sub_prefix}├──"), format!("{sub_prefix}│  "))
    }
}
