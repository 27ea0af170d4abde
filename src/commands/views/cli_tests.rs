//! CLI parsing tests for views command.

#[cfg(test)]
mod tests {
    use crate::cli::Args;
    use clap::Parser;
    use rstest::rstest;

    crate::cli_defaults_test! {
        command: "views",
        variant: Views,
        required_args: [],
        defaults: {
            materialized: false,
            definitions: false,
        },
    }

    crate::cli_option_test! {
        command: "views",
        variant: Views,
        test_name: test_with_materialized,
        args: ["-m"],
        field: materialized,
        expected: true,
    }

    crate::cli_option_test! {
        command: "views",
        variant: Views,
        test_name: test_with_definitions,
        args: ["--definitions"],
        field: definitions,
        expected: true,
    }
}
