// Result presentation: read-only projection of accumulated results onto the
// console. One result renders inline; several render as per-video sections
// labeled with the originating URL.

use console::style;

use crate::models::VideoResult;

pub fn print_results(results: &[VideoResult]) {
    if results.is_empty() {
        return;
    }

    println!();
    println!("{}", style("Results").bold().underlined());

    if let [only] = results {
        print_result(only, false);
    } else {
        for result in results {
            print_result(result, true);
        }
    }
}

fn print_result(result: &VideoResult, show_url: bool) {
    println!();
    println!("{}", style(format!("Video {}", result.index)).bold().cyan());
    if show_url {
        println!("URL: {}", result.url);
    }
    println!();
    println!("{}", style("Arabic transcript").bold());
    println!("{}", result.arabic);
    println!();
    println!("{}", style("English translation").bold());
    println!("{}", result.english);
}
