//! `girbind classify` command

use anyhow::Result;

use crate::cli::ClassifyArgs;
use girbind::core::{classify, NativeTypeToken};

pub fn execute(args: ClassifyArgs) -> Result<()> {
    for token in &args.tokens {
        let token = NativeTypeToken::new(token);
        let class = classify(&token);

        let mut flags = Vec::new();
        if class.is_pointer {
            flags.push("pointer");
            if class.is_primitive {
                flags.push("by-ref");
            }
        }

        if flags.is_empty() {
            println!("{}: {}", token, class.category);
        } else {
            println!("{}: {} [{}]", token, class.category, flags.join(", "));
        }
    }

    Ok(())
}
