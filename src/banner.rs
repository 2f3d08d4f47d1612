// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    // Using a raw string literal for the multi-line banner
    let banner = r#"
 __  __                                 _
|  \/  | __ _ _ __   __ _  _____   ____ | |_ ___
| |\/| |/ _` | '_ \ / _` |/ _ \ \ / / _`| __/ _ \
| |  | | (_| | | | | (_| | (_) \ V / (_| | ||  __/
|_|  |_|\__,_|_| |_|\__, |\___/ \_/ \__,_|\__\___|
                    |___/

    Mango Maturity Classification
"#;
    println!("{}", banner);
}
