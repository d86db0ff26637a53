use anyhow::Result;
use colored::Colorize;
use funnel_document::TemplateCatalog;

pub fn templates() -> Result<()> {
    let catalog = TemplateCatalog::builtin();

    println!("{}", "📚 Page templates".bright_blue().bold());
    for template in catalog.iter() {
        println!(
            "  {:<18} {:<12} {}",
            template.name.bright_white(),
            template.category.to_string().cyan(),
            template.label
        );
    }

    Ok(())
}
