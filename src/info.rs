/// The read-only "about" view: credits and usage, no data from a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoPage {
    pub title: &'static str,
    pub author: &'static str,
    pub contact: &'static str,
    pub technologies: &'static [&'static str],
    pub description: &'static str,
    pub how_it_works: &'static [&'static str],
}

pub const INFO_PAGE: InfoPage = InfoPage {
    title: "About the author and the technologies used",
    author: "Your Name",
    contact: "your@email.example",
    technologies: &["Rust", "clap", "csv", "printpdf", "resvg", "tracing"],
    description: "Generates points on a circle from a given center, radius and point count.",
    how_it_works: &[
        "Enter the center (X, Y), radius, point count and point color.",
        "The chart and the coordinate table are produced; CSV and a PDF report with the chart and parameters can be saved.",
    ],
};

impl InfoPage {
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(self.title);
        out.push('\n');
        out.push_str(&"=".repeat(self.title.chars().count()));
        out.push_str("\n\n");
        out.push_str(&format!("Author: {}\n", self.author));
        out.push_str(&format!("Contact: {}\n", self.contact));
        out.push_str(&format!("Technologies: {}\n", self.technologies.join(", ")));
        out.push_str(&format!("Description: {}\n\n", self.description));
        out.push_str("How it works\n");
        for item in self.how_it_works {
            out.push_str(&format!("- {item}\n"));
        }
        out.push_str(&format!(
            "\nRun `cpts` without `--page info` to return to the generator ({} / {}).\n",
            crate::export::CSV_FILE.file_name,
            crate::export::PDF_FILE.file_name
        ));
        out
    }
}
