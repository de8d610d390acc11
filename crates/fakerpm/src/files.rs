pub(crate) mod spec_file;
