pub mod logger;

#[cfg(test)]
pub(crate) mod test_support;
