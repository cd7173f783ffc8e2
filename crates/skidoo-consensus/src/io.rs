pub use bitcoin::io::{BufRead, Error, Read, Write};
