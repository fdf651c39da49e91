use std::collections::HashSet;

/// Keeps the authoritative entities whose name is also known locally.
///
/// Output order is the authoritative order; `local_names` only decides
/// membership. An empty result is not an error here, callers decide what
/// "nothing in common" means for them.
pub fn reconcile<T, S, F>(authoritative: &[T], local_names: &[S], name_of: F) -> Vec<String>
where
    S: AsRef<str>,
    F: Fn(&T) -> &str,
{
    let local: HashSet<&str> = local_names.iter().map(AsRef::as_ref).collect();
    authoritative
        .iter()
        .map(|item| name_of(item))
        .filter(|name| local.contains(name))
        .map(str::to_string)
        .collect()
}

/// Like [`reconcile`], but keeps the entities themselves.
pub fn reconcile_items<T, S, F>(authoritative: Vec<T>, local_names: &[S], name_of: F) -> Vec<T>
where
    S: AsRef<str>,
    F: Fn(&T) -> &str,
{
    let local: HashSet<&str> = local_names.iter().map(AsRef::as_ref).collect();
    authoritative
        .into_iter()
        .filter(|item| local.contains(name_of(item)))
        .collect()
}
