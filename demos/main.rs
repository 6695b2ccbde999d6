use tex2svg::Converter;

fn main() -> Result<(), tex2svg::Error> {
    let mut converter = Converter::new();
    let output = converter.convert(r"\int_{-\infty}^\infty e^{-x^2}\,\mathrm dx", true)?;
    println!("{output}");
    Ok(())
}
